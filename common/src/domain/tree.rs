use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top level sections of the site content tree.
pub const SECTIONS: [&'static str; 9] = [
    "homepage",
    "aboutPage",
    "academicsPage",
    "admissionsPage",
    "eventsSettings",
    "gallerySettings",
    "contactPage",
    "footer",
    "globalSettings",
];

/// A list of cards inside the tree, addressed by a dotted path.
/// Every card of such a list carries an `id` built from `prefix`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardList {
    pub path: &'static str,
    pub prefix: &'static str,
}

pub const CARD_LISTS: &[CardList] = &[
    CardList { path: "homepage.highlights", prefix: "highlight" },
    CardList { path: "homepage.stats", prefix: "stat" },
    CardList { path: "homepage.testimonials", prefix: "testimonial" },
    CardList { path: "aboutPage.timeline", prefix: "timeline" },
    CardList { path: "aboutPage.values", prefix: "value" },
    CardList { path: "aboutPage.leadership", prefix: "leader" },
    CardList { path: "academicsPage.programs", prefix: "program" },
    CardList { path: "academicsPage.facilities", prefix: "facility" },
    CardList { path: "admissionsPage.steps", prefix: "step" },
    CardList { path: "admissionsPage.requirements", prefix: "requirement" },
    CardList { path: "admissionsPage.formLinks", prefix: "form" },
    CardList { path: "admissionsPage.faqs", prefix: "faq" },
    CardList { path: "eventsSettings.categories", prefix: "category" },
    CardList { path: "gallerySettings.albums", prefix: "album" },
    CardList { path: "contactPage.officeHours", prefix: "hours" },
    CardList { path: "footer.quickLinks", prefix: "link" },
    CardList { path: "footer.socialLinks", prefix: "social" },
];

pub fn card_list(path: &str) -> Option<&'static CardList> {
    CARD_LISTS.iter().find(|list| list.path == path)
}

/// The structured content of a site.
///
/// The tree is kept as a JSON object: sections are free to carry fields the
/// service does not know about, and the difference between an absent key and
/// an explicit `null` matters when a partial update is merged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteTree(Map<String, Value>);

impl SiteTree {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts only JSON objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Value at a dotted path, e.g. `aboutPage.timeline`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.0.get(first)?, |value, segment| {
            value.as_object().and_then(|object| object.get(segment))
        })
    }

    pub fn str_at(&self, path: &str) -> Option<&str> {
        self.get_path(path).and_then(Value::as_str)
    }

    /// Writes `value` at a dotted path. Missing or non-object intermediate
    /// nodes are replaced by empty objects.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.0;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(object) = entry else {
                return;
            };
            current = object;
        }
        current.insert(last.to_string(), value);
    }

    /// Cards of a list, or an empty slice when the path holds no array.
    pub fn cards(&self, path: &str) -> &[Value] {
        self.get_path(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl From<SiteTree> for Value {
    fn from(value: SiteTree) -> Self {
        Value::Object(value.0)
    }
}

/// Reads a card field as text, accepting numbers as well (years are often typed as numbers).
pub fn card_text<'a>(card: &'a Value, field: &str) -> Option<std::borrow::Cow<'a, str>> {
    match card.get(field)? {
        Value::String(text) => Some(std::borrow::Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(std::borrow::Cow::Owned(number.to_string())),
        _ => None,
    }
}

/// `isVisible` defaults to true, only an explicit `false` hides a card.
pub fn is_visible(card: &Value) -> bool {
    card.get("isVisible").and_then(Value::as_bool) != Some(false)
}
