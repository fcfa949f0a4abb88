use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    content::FlatContent,
    defaults::{create_defaults, default_cards, fresh_card_id},
    legacy::seed_from_legacy,
    tree::{CARD_LISTS, CardList, SiteTree},
};

/// What an empty card list means after a merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyListPolicy {
    /// An empty list is a valid state: the site shows no items.
    #[default]
    Preserve,
    /// An empty list is refilled with the default cards.
    RestoreDefaults,
}

/// Merges `candidate` onto the legacy seed (or fresh defaults) and makes
/// sure every card list is present with stable ids.
pub fn normalize(
    candidate: Option<&Value>,
    legacy: Option<&FlatContent>,
    policy: EmptyListPolicy,
) -> SiteTree {
    let base = match legacy {
        Some(flat) => seed_from_legacy(flat),
        None => create_defaults(),
    };

    match candidate {
        Some(candidate) => merge_onto(&base, candidate, policy),
        None => ensure_ids(base, policy),
    }
}

/// Merges `candidate` onto an explicit base tree.
///
/// Objects are merged key by key, every other incoming value (arrays included)
/// replaces the base value. Keys absent from `candidate` keep the base value.
pub fn merge_onto(base: &SiteTree, candidate: &Value, policy: EmptyListPolicy) -> SiteTree {
    let mut merged = base.as_map().clone();
    match candidate {
        Value::Object(incoming) => deep_merge(&mut merged, incoming),
        Value::Null => {}
        other => {
            tracing::warn!(kind = json_kind(other), "ignoring site content that is not an object");
        }
    }
    ensure_ids(SiteTree::new(merged), policy)
}

fn deep_merge(base: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for (key, value) in incoming {
        if let (Some(Value::Object(base_object)), Value::Object(incoming_object)) =
            (base.get_mut(key), value)
        {
            deep_merge(base_object, incoming_object);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

fn ensure_ids(mut tree: SiteTree, policy: EmptyListPolicy) -> SiteTree {
    for list in CARD_LISTS {
        let cards = match tree.get_path(list.path) {
            Some(Value::Array(items)) if !items.is_empty() => stamp_ids(list, items),
            Some(Value::Array(_)) if policy == EmptyListPolicy::Preserve => Vec::new(),
            _ => default_cards(list.path),
        };
        tree.set_path(list.path, Value::Array(cards));
    }
    tree
}

/// Keeps every valid, unique id and stamps the remaining cards with
/// `<prefix>-<position>`. Non-object items are dropped.
fn stamp_ids(list: &CardList, items: &[Value]) -> Vec<Value> {
    let reserved: HashSet<String> = items.iter().filter_map(existing_id).collect();
    let mut used = HashSet::with_capacity(items.len());
    let mut stamped = Vec::with_capacity(items.len());

    for item in items {
        let Value::Object(card) = item else {
            tracing::warn!(path = list.path, kind = json_kind(item), "dropping card that is not an object");
            continue;
        };

        let id = match existing_id(item) {
            Some(id) if !used.contains(&id) => id,
            _ => {
                let positional = format!("{}-{}", list.prefix, stamped.len() + 1);
                if reserved.contains(&positional) || used.contains(&positional) {
                    fresh_card_id(list.prefix)
                } else {
                    positional
                }
            }
        };

        let mut card = card.clone();
        card.insert("id".to_string(), Value::String(id.clone()));
        used.insert(id);
        stamped.push(Value::Object(card));
    }

    stamped
}

fn existing_id(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
