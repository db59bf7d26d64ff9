use crate::models::{RiskLevel, StrategyType};

/// Risk predicate: everything, or one exact tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskFilter {
    #[default]
    All,
    Only(RiskLevel),
}

impl RiskFilter {
    /// Unrecognized values fail open to `All`
    pub fn parse(raw: &str) -> Self {
        match RiskLevel::parse(raw) {
            Some(level) => RiskFilter::Only(level),
            None => {
                if raw.trim() != "all" {
                    tracing::debug!("Unknown risk filter '{}', showing all", raw);
                }
                RiskFilter::All
            }
        }
    }

    pub fn matches(&self, level: RiskLevel) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::Only(wanted) => *wanted == level,
        }
    }
}

/// Strategy family predicate: everything, or one exact type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(StrategyType),
}

impl TypeFilter {
    /// Unrecognized values fail open to `All`
    pub fn parse(raw: &str) -> Self {
        match StrategyType::parse(raw) {
            Some(strategy_type) => TypeFilter::Only(strategy_type),
            None => {
                if raw.trim() != "all" {
                    tracing::debug!("Unknown type filter '{}', showing all", raw);
                }
                TypeFilter::All
            }
        }
    }

    pub fn matches(&self, strategy_type: StrategyType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => *wanted == strategy_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Highest return first
    Performance,
    /// A to Z
    Name,
    /// Conservative first
    Risk,
    /// Newest first
    Recent,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Performance => "performance",
            SortKey::Name => "name",
            SortKey::Risk => "risk",
            SortKey::Recent => "recent",
        }
    }

    /// `None` means keep input order
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "performance" => Some(SortKey::Performance),
            "name" => Some(SortKey::Name),
            "risk" => Some(SortKey::Risk),
            "recent" => Some(SortKey::Recent),
            other => {
                tracing::debug!("Unknown sort key '{}', keeping input order", other);
                None
            }
        }
    }
}

/// Dashboard filter/sort selection
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub search_text: String,
    pub risk: RiskFilter,
    pub strategy_type: TypeFilter,
    pub sort_by: Option<SortKey>,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            risk: RiskFilter::All,
            strategy_type: TypeFilter::All,
            sort_by: Some(SortKey::Performance),
        }
    }
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loosely typed UI/CLI values, never failing
    pub fn from_raw(search_text: &str, risk: &str, strategy_type: &str, sort_by: &str) -> Self {
        Self {
            search_text: search_text.to_string(),
            risk: RiskFilter::parse(risk),
            strategy_type: TypeFilter::parse(strategy_type),
            sort_by: SortKey::parse(sort_by),
        }
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_risk(mut self, level: RiskLevel) -> Self {
        self.risk = RiskFilter::Only(level);
        self
    }

    pub fn with_type(mut self, strategy_type: StrategyType) -> Self {
        self.strategy_type = TypeFilter::Only(strategy_type);
        self
    }

    pub fn with_sort(mut self, key: SortKey) -> Self {
        self.sort_by = Some(key);
        self
    }

    pub fn unsorted(mut self) -> Self {
        self.sort_by = None;
        self
    }
}
