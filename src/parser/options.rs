//! Parsing options and configuration.

/// Options controlling the protocol pipeline.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Capture per-line offsets and interjection positions
    pub track_offsets: bool,

    /// Attach diagnostics to the output
    pub include_debug: bool,

    /// Only accept speaker headers set in a bold font
    pub require_bold_headers: bool,

    /// Accept member headers (`Abg.`) without a party token
    pub accept_missing_party: bool,

    /// Detect speaker headers that follow a sentence end inside a line
    pub inline_header_fallback: bool,

    /// Keep interjection records free of embedded positions
    pub compact_interjections: bool,

    /// Tag each interjection with a category
    pub interjection_categories: bool,

    /// Emit interjection positions into a separate collection
    pub externalize_offsets: bool,

    /// Reconstruct pages in parallel
    pub parallel: bool,

    /// Header/footer removal strategy
    pub boilerplate: BoilerplateMode,

    /// Renumber pages with the printed page numbers when they can be inferred
    pub printed_page_numbers: bool,

    /// Also emit the agenda/speaker/other partition of the contents block
    pub toc_partition: bool,

    /// Number of leading pages searched for the contents heading
    pub toc_search_pages: u32,

    /// Reflow speech lines into paragraphs
    pub reflow_paragraphs: bool,

    /// Segment derivation and numbering
    pub segments: SegmentMode,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable offset tracking.
    pub fn with_offsets(mut self, track: bool) -> Self {
        self.track_offsets = track;
        self
    }

    /// Enable or disable diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.include_debug = debug;
        self
    }

    /// Require bold speaker headers.
    pub fn require_bold(mut self) -> Self {
        self.require_bold_headers = true;
        self
    }

    /// Reject member headers without a party token.
    pub fn require_party(mut self) -> Self {
        self.accept_missing_party = false;
        self
    }

    /// Enable or disable the in-paragraph header fallback.
    pub fn with_inline_headers(mut self, enabled: bool) -> Self {
        self.inline_header_fallback = enabled;
        self
    }

    /// Enable or disable compact interjections.
    pub fn with_compact_interjections(mut self, compact: bool) -> Self {
        self.compact_interjections = compact;
        self
    }

    /// Enable or disable interjection categories.
    pub fn with_categories(mut self, categories: bool) -> Self {
        self.interjection_categories = categories;
        self
    }

    /// Enable or disable externalized interjection offsets.
    pub fn with_externalized_offsets(mut self, externalize: bool) -> Self {
        self.externalize_offsets = externalize;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the boilerplate strategy.
    pub fn with_boilerplate(mut self, mode: BoilerplateMode) -> Self {
        self.boilerplate = mode;
        self
    }

    /// Enable or disable printed page numbering.
    pub fn with_printed_page_numbers(mut self, enabled: bool) -> Self {
        self.printed_page_numbers = enabled;
        self
    }

    /// Enable or disable the partitioned TOC view.
    pub fn with_toc_partition(mut self, enabled: bool) -> Self {
        self.toc_partition = enabled;
        self
    }

    /// Set how many leading pages are searched for the contents block.
    pub fn with_toc_search_pages(mut self, pages: u32) -> Self {
        self.toc_search_pages = pages;
        self
    }

    /// Enable or disable paragraph reflow.
    pub fn with_reflow(mut self, reflow: bool) -> Self {
        self.reflow_paragraphs = reflow;
        self
    }

    /// Set segment mode.
    pub fn with_segments(mut self, mode: SegmentMode) -> Self {
        self.segments = mode;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            track_offsets: false,
            include_debug: false,
            require_bold_headers: false,
            accept_missing_party: true,
            inline_header_fallback: true,
            compact_interjections: true,
            interjection_categories: true,
            externalize_offsets: true,
            parallel: true,
            boilerplate: BoilerplateMode::Both,
            printed_page_numbers: true,
            toc_partition: false,
            toc_search_pages: 3,
            reflow_paragraphs: false,
            segments: SegmentMode::Off,
        }
    }
}

/// Which header/footer removal mechanisms run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoilerplateMode {
    /// Keep every line
    Off,
    /// Document-wide repeated edge lines and short page numbers
    Frequency,
    /// Per-page header and closing patterns
    Patterns,
    /// Frequency pass followed by the pattern pass
    #[default]
    Both,
}

impl BoilerplateMode {
    /// Whether the frequency pass runs.
    pub fn frequency(&self) -> bool {
        matches!(self, BoilerplateMode::Frequency | BoilerplateMode::Both)
    }

    /// Whether the pattern pass runs.
    pub fn patterns(&self) -> bool {
        matches!(self, BoilerplateMode::Patterns | BoilerplateMode::Both)
    }
}

/// How speech segments are derived and numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentMode {
    /// No segments
    #[default]
    Off,
    /// Segments without numbers
    Plain,
    /// Every segment numbered "N.1", "N.2", ...
    All,
    /// Only interjection segments numbered
    InterjectionsOnly,
}
