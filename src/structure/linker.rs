//! Linking speeches to agenda items by page range.

use crate::model::{AgendaItem, Speech};

/// Link every speech to the agenda item whose page range contains its
/// start page.
///
/// Items are sorted by `start_page`; each covers `[start_page, next start)`
/// and the last one is open-ended. A speech links to at most one item.
/// Items without a start page sort last and never receive links.
pub fn link_agenda(items: &mut [AgendaItem], speeches: &[Speech]) {
    if items.is_empty() {
        return;
    }

    items.sort_by_key(|item| (item.start_page.is_none(), item.start_page));
    for item in items.iter_mut() {
        item.linked_speech_indices.clear();
    }

    let starts: Vec<u32> = items.iter().map_while(|item| item.start_page).collect();

    for speech in speeches {
        // Last item whose start does not exceed the speech page.
        let position = starts.partition_point(|&start| start <= speech.start_page);
        if position == 0 {
            continue;
        }
        let index = position - 1;
        // Several items may share a start page; the first one wins.
        let first = starts[..=index]
            .iter()
            .position(|&start| start == starts[index])
            .unwrap_or(index);
        items[first].linked_speech_indices.push(speech.index);
    }
}
