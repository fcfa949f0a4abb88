use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;

pub mod content;
pub mod defaults;
pub mod history;
pub mod legacy;
pub mod normalize;
pub mod stored;
pub mod tree;

pub use content::FlatContent;
pub use defaults::{create_defaults, default_cards};
pub use history::{HISTORY_LIMIT, SiteMeta, VersionSnapshot};
pub use legacy::{seed_from_legacy, to_legacy_content};
pub use normalize::{EmptyListPolicy, merge_onto, normalize};
pub use stored::{SiteManagement, StoredSiteManagement};
pub use tree::{CARD_LISTS, CardList, SECTIONS, SiteTree};

// Site ids end up as primary key values and in urls,
// so only lowercase ASCII letters, digits, dash and underscore are allowed.
const SITE_ID_REGEX: &str = r"^[a-z0-9_-]+$";

static SITE_ID_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SITE_ID_REGEX).expect("SITE_ID_REGEX must be a valid regex")
});

fn is_eligible_site_id(id: &str) -> bool {
    SITE_ID_REGEX_COMPILED.is_match(id)
}

/// Identifier of one managed site. Every stored document is keyed by it.
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 40, predicate = is_eligible_site_id),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct SiteId(String);
