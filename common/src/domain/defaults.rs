use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::domain::tree::{SiteTree, card_list};

/// A fully populated content tree with fresh card ids.
pub fn create_defaults() -> SiteTree {
    let tree = json!({
        "homepage": {
            "hero": {
                "title": "A school where every child is known",
                "subtitle": "Small classes, dedicated teachers and a curriculum that builds curiosity for life.",
                "backgroundImage": "",
                "ctaText": "Apply now",
                "ctaLink": "/admissions",
            },
            "highlights": cards("homepage.highlights"),
            "stats": cards("homepage.stats"),
            "testimonials": cards("homepage.testimonials"),
        },
        "aboutPage": {
            "title": "About us",
            "intro": "Founded by teachers and parents, our school combines academic rigour with care for each student.",
            "vision": "To raise confident, compassionate learners ready to shape their world.",
            "mission": "We provide a challenging, supportive education that develops the whole child.",
            "image": "",
            "timeline": cards("aboutPage.timeline"),
            "values": cards("aboutPage.values"),
            "leadership": cards("aboutPage.leadership"),
        },
        "academicsPage": {
            "title": "Academics",
            "intro": "From the early years to graduation, our programs grow with each student.",
            "programs": cards("academicsPage.programs"),
            "facilities": cards("academicsPage.facilities"),
        },
        "admissionsPage": {
            "title": "Admissions",
            "intro": "We welcome applications throughout the year. Here is how to join our community.",
            "steps": cards("admissionsPage.steps"),
            "requirements": cards("admissionsPage.requirements"),
            "formLinks": cards("admissionsPage.formLinks"),
            "faqs": cards("admissionsPage.faqs"),
            "tuitionNote": "Tuition details are shared during the family interview.",
        },
        "eventsSettings": {
            "title": "Events",
            "intro": "Concerts, fairs and open days: see what is happening at school.",
            "showPastEvents": true,
            "eventsPerPage": 9,
            "categories": cards("eventsSettings.categories"),
        },
        "gallerySettings": {
            "title": "Gallery",
            "intro": "Moments from classrooms, trips and celebrations.",
            "layout": "grid",
            "albums": cards("gallerySettings.albums"),
        },
        "contactPage": {
            "title": "Contact us",
            "intro": "We are happy to answer your questions or arrange a visit.",
            "email": "info@school.example",
            "phone": "+1 555 0100",
            "address": "1 School Lane",
            "mapEmbedUrl": "",
            "officeHours": cards("contactPage.officeHours"),
        },
        "footer": {
            "tagline": "Learning together since 1998.",
            "copyright": "All rights reserved.",
            "quickLinks": cards("footer.quickLinks"),
            "socialLinks": cards("footer.socialLinks"),
        },
        "globalSettings": {
            "schoolName": "Our School",
            "logoUrl": "",
            "faviconUrl": "",
            "primaryColor": "#1d4ed8",
            "secondaryColor": "#f59e0b",
            "announcement": {
                "enabled": false,
                "text": "",
                "link": "",
            },
            "seo": {
                "title": "Our School",
                "description": "A private school for curious minds.",
            },
        },
    });

    match tree {
        Value::Object(fields) => SiteTree::new(fields),
        _ => SiteTree::default(),
    }
}

/// Default cards of one card list, each with a fresh id.
/// Unknown paths yield an empty list.
pub fn default_cards(path: &str) -> Vec<Value> {
    let Some(list) = card_list(path) else {
        return Vec::new();
    };

    card_templates(path)
        .into_iter()
        .map(|template| with_id(template, fresh_card_id(list.prefix)))
        .collect()
}

/// `<prefix>-<8 hex chars>`
pub fn fresh_card_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &uuid[..8])
}

fn cards(path: &str) -> Value {
    Value::Array(default_cards(path))
}

fn with_id(template: Value, id: String) -> Value {
    let mut card = Map::new();
    card.insert("id".to_string(), Value::String(id));
    if let Value::Object(fields) = template {
        card.extend(fields);
    }
    Value::Object(card)
}

fn card_templates(path: &str) -> Vec<Value> {
    match path {
        "homepage.highlights" => vec![
            json!({"title": "Small classes", "description": "No more than eighteen students per class.", "icon": "users", "isVisible": true}),
            json!({"title": "Bilingual program", "description": "Daily lessons in two languages from the first grade.", "icon": "globe", "isVisible": true}),
            json!({"title": "Arts and sports", "description": "Music, theatre and a full sports program every week.", "icon": "palette", "isVisible": true}),
        ],
        "homepage.stats" => vec![
            json!({"label": "Students", "value": "420", "isVisible": true}),
            json!({"label": "Teachers", "value": "48", "isVisible": true}),
            json!({"label": "Years of experience", "value": "25", "isVisible": true}),
        ],
        "homepage.testimonials" => vec![
            json!({"author": "Parent of a second grader", "quote": "Our daughter runs to school every morning.", "image": "", "isVisible": true}),
        ],
        "aboutPage.timeline" => vec![
            json!({"year": "1998", "description": "The school opens with two classes.", "isVisible": true}),
            json!({"year": "2008", "description": "A new building with science labs is completed.", "isVisible": true}),
            json!({"year": "2018", "description": "The high school program graduates its first class.", "isVisible": true}),
        ],
        "aboutPage.values" => vec![
            json!({"title": "Respect", "description": "We listen to and care for one another.", "isVisible": true}),
            json!({"title": "Curiosity", "description": "We ask questions and look for answers together.", "isVisible": true}),
            json!({"title": "Responsibility", "description": "We own our learning and our actions.", "isVisible": true}),
        ],
        "aboutPage.leadership" => vec![
            json!({"name": "School principal", "role": "Principal", "photo": "", "bio": "", "isVisible": true}),
        ],
        "academicsPage.programs" => vec![
            json!({"name": "Early years", "ageRange": "3-6", "description": "Play based learning in a warm environment.", "image": "", "isVisible": true}),
            json!({"name": "Primary school", "ageRange": "6-11", "description": "Strong foundations in literacy, numeracy and science.", "image": "", "isVisible": true}),
            json!({"name": "Secondary school", "ageRange": "11-18", "description": "Academic depth with guidance towards university.", "image": "", "isVisible": true}),
        ],
        "academicsPage.facilities" => vec![
            json!({"name": "Library", "description": "Over ten thousand books and quiet study rooms.", "image": "", "isVisible": true}),
            json!({"name": "Science labs", "description": "Fully equipped physics, chemistry and biology labs.", "image": "", "isVisible": true}),
            json!({"name": "Sports hall", "description": "Indoor courts and a fitness area.", "image": "", "isVisible": true}),
        ],
        "admissionsPage.steps" => vec![
            json!({"title": "Submit an inquiry", "description": "Fill in the online inquiry form.", "isVisible": true}),
            json!({"title": "Visit the school", "description": "Meet our team and see the classrooms.", "isVisible": true}),
            json!({"title": "Assessment", "description": "A friendly age appropriate assessment.", "isVisible": true}),
            json!({"title": "Enrollment", "description": "Confirm the place and complete the paperwork.", "isVisible": true}),
        ],
        "admissionsPage.requirements" => vec![
            json!({"text": "Birth certificate copy", "isVisible": true}),
            json!({"text": "Previous school reports", "isVisible": true}),
            json!({"text": "Medical record", "isVisible": true}),
        ],
        "admissionsPage.formLinks" => vec![
            json!({"label": "Application form", "url": "", "fileUrl": "", "isVisible": true}),
        ],
        "admissionsPage.faqs" => vec![
            json!({"question": "When can my child start?", "answer": "Places are offered throughout the year when available.", "isVisible": true}),
        ],
        "eventsSettings.categories" => vec![
            json!({"name": "Open days", "color": "#1d4ed8", "isVisible": true}),
            json!({"name": "Celebrations", "color": "#f59e0b", "isVisible": true}),
        ],
        "gallerySettings.albums" => vec![
            json!({"title": "School life", "coverImage": "", "description": "", "isVisible": true}),
        ],
        "contactPage.officeHours" => vec![
            json!({"days": "Monday - Friday", "hours": "8:00 - 17:00", "isVisible": true}),
        ],
        "footer.quickLinks" => vec![
            json!({"label": "About", "url": "/about", "isVisible": true}),
            json!({"label": "Academics", "url": "/academics", "isVisible": true}),
            json!({"label": "Admissions", "url": "/admissions", "isVisible": true}),
            json!({"label": "Contact", "url": "/contact", "isVisible": true}),
        ],
        "footer.socialLinks" => vec![
            json!({"platform": "facebook", "url": "", "isVisible": true}),
            json!({"platform": "instagram", "url": "", "isVisible": true}),
        ],
        _ => Vec::new(),
    }
}
