//! # Query Interpreter Module
//!
//! Turns a free-text chat message into an [`Intent`]. Matching is plain
//! substring containment on the normalized (lowercased, trimmed) text:
//! a message containing both the facility keyword and the query keyword is
//! a region query, and whatever is left after removing those keywords is
//! the region.

use tracing::debug;

/// Default keyword that opens the interactive menu
pub const DEFAULT_ROOT_MENU_KEYWORDS: &[&str] = &["選單", "menu"];
/// Default keyword naming the facility kind
pub const DEFAULT_FACILITY_KEYWORD: &str = "醫院";
/// Default keyword marking a search request
pub const DEFAULT_QUERY_KEYWORD: &str = "查詢";

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ShowRootMenu,
    /// Region query; `region` is lowercased and may be empty
    TextQuery { region: String },
    Unrecognized,
}

/// Keywords recognised in free text
#[derive(Debug, Clone)]
pub struct QueryKeywords {
    pub root_menu: Vec<String>,
    pub facility: String,
    pub query: String,
}

impl Default for QueryKeywords {
    fn default() -> Self {
        Self {
            root_menu: DEFAULT_ROOT_MENU_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            facility: DEFAULT_FACILITY_KEYWORD.to_string(),
            query: DEFAULT_QUERY_KEYWORD.to_string(),
        }
    }
}

/// Free-text interpreter
#[derive(Debug, Clone, Default)]
pub struct QueryInterpreter {
    keywords: QueryKeywords,
}

impl QueryInterpreter {
    pub fn new(keywords: QueryKeywords) -> Self {
        Self {
            keywords: QueryKeywords {
                root_menu: keywords.root_menu.iter().map(|k| normalize(k)).collect(),
                facility: normalize(&keywords.facility),
                query: normalize(&keywords.query),
            },
        }
    }

    pub fn keywords(&self) -> &QueryKeywords {
        &self.keywords
    }

    pub fn interpret(&self, raw_text: &str) -> Intent {
        let text = normalize(raw_text);

        if self.keywords.root_menu.iter().any(|k| *k == text) {
            return Intent::ShowRootMenu;
        }

        if text.contains(&self.keywords.facility) && text.contains(&self.keywords.query) {
            // Query keyword first, then facility keyword; the second pass also
            // removes a facility keyword that the first pass joined together
            let region = text
                .replace(&self.keywords.query, "")
                .replace(&self.keywords.facility, "")
                .trim()
                .to_string();
            debug!(region = %region, "Parsed region query");
            return Intent::TextQuery { region };
        }

        Intent::Unrecognized
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
