//! Work-order tagging: derives a category, client type and technology/skill tags from a
//! work-order title using fixed keyword tables. Matching is plain lower-cased substring search.

use serde::Serialize;

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_CLIENT_TYPE: &str = "enterprise";

/// Checked in order; the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "desktop",
        &["desktop", "pc", "workstation", "laptop", "computer", "windows", "mac", "imac"],
    ),
    (
        "retail",
        &["pos", "register", "kiosk", "retail", "pin pad", "payment", "cash drawer"],
    ),
    (
        "networking",
        &["network", "router", "switch", "voip", "phone", "cable", "wifi"],
    ),
    (
        "printers",
        &["printer", "print", "scanning", "copier", "xerox", "hp printer"],
    ),
    ("telephony", &["phone", "voip", "telecom", "pbx", "caption phone"]),
    ("medical", &["medical", "healthcare", "cart", "capsa", "hospital"]),
    ("security", &["security", "access control", "camera", "surveillance"]),
    ("server", &["server", "rack", "data center", "storage"]),
    ("general", &["install", "setup", "configuration", "maintenance"]),
];

const CLIENT_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("retail", &["retail", "store", "mall", "shop"]),
    ("healthcare", &["hospital", "medical", "healthcare"]),
    ("financial", &["bank", "financial", "credit"]),
];

const TECHNOLOGY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Windows", &["windows", "win 7", "win 10", "windows 7", "windows 10"]),
    ("Mac/Apple", &["mac", "imac", "apple", "macbook"]),
    ("HP", &["hp", "hewlett packard"]),
    ("Dell", &["dell"]),
    ("Xerox", &["xerox", "fuji xerox"]),
    ("POS Systems", &["pos", "point of sale", "register"]),
    ("VoIP", &["voip", "voice over ip"]),
    ("Network Equipment", &["router", "switch", "network"]),
    ("Printers", &["printer", "print", "scanning"]),
    ("Medical Equipment", &["medical cart", "healthcare cart"]),
    ("Security Systems", &["access control", "security camera"]),
];

const SKILL_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Hardware Installation",
        &["install", "setup", "deployment", "replacement"],
    ),
    ("Troubleshooting", &["troubleshoot", "diagnose", "repair", "fix"]),
    ("System Configuration", &["configuration", "config", "setup"]),
    ("Network Support", &["network", "connectivity", "cable"]),
    ("Customer Service", &["onsite", "client", "customer"]),
    ("Project Management", &["project", "lead", "coordination"]),
    ("Technical Support", &["support", "maintenance", "service"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkOrderTags {
    pub work_category: String,
    pub client_type: String,
    pub technologies: Vec<String>,
    pub skills: Vec<String>,
}

/// Derives every tag for a work-order title.
pub fn tag_work_order(title: &str) -> WorkOrderTags {
    let lowered = title.to_lowercase();
    WorkOrderTags {
        work_category: first_match(&lowered, CATEGORY_KEYWORDS)
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string(),
        client_type: first_match(&lowered, CLIENT_TYPE_KEYWORDS)
            .unwrap_or(DEFAULT_CLIENT_TYPE)
            .to_string(),
        technologies: all_matches(&lowered, TECHNOLOGY_KEYWORDS),
        skills: all_matches(&lowered, SKILL_KEYWORDS),
    }
}

fn first_match<'a>(lowered: &str, table: &[(&'a str, &[&str])]) -> Option<&'a str> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(label, _)| *label)
}

fn all_matches(lowered: &str, table: &[(&str, &[&str])]) -> Vec<String> {
    table
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(label, _)| label.to_string())
        .collect()
}
