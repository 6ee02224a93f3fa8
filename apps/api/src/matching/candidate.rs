//! Candidate items: the read-only snapshot the matcher scores.
//!
//! Storage rows are converted into `CandidateItem`s by the caller; the matcher never touches
//! raw rows.

use serde::{Deserialize, Serialize, Serializer};

use crate::models::component::ComponentRow;
use crate::models::project::ProjectRow;
use crate::models::work_order::WorkOrderRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Component,
    WorkOrder,
    Project,
}

/// A decoded technology/skill list.
///
/// Stored as JSON text. A value that is not a JSON list of strings is kept verbatim as
/// `Malformed` so it still contributes to search text but never earns bonus points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    Parsed(Vec<String>),
    Malformed(String),
}

static EMPTY_TAGS: TagList = TagList::Parsed(Vec::new());

impl TagList {
    /// Decodes a nullable JSON text column. `NULL` and blank text decode to an empty list.
    pub fn from_column(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => TagList::Parsed(Vec::new()),
            Some(text) => match serde_json::from_str::<Vec<String>>(text) {
                Ok(tags) => TagList::Parsed(tags),
                Err(_) => TagList::Malformed(text.to_string()),
            },
        }
    }

    /// The parsed tags, or `None` when the stored value was malformed.
    pub fn tags(&self) -> Option<&[String]> {
        match self {
            TagList::Parsed(tags) => Some(tags),
            TagList::Malformed(_) => None,
        }
    }

    /// Text contributed to a candidate's searchable text.
    pub fn search_fragment(&self) -> String {
        match self {
            TagList::Parsed(tags) => tags.join(" "),
            TagList::Malformed(raw) => raw.clone(),
        }
    }

    /// Encodes a list for storage in a JSON text column.
    pub fn encode(tags: &[String]) -> String {
        serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Serializes a JSON text column as a decoded `TagList` in API responses.
pub fn serialize_tag_column<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    TagList::from_column(value.as_deref()).serialize(serializer)
}

/// A reusable resume component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCandidate {
    pub id: i64,
    pub section_type: String,
    pub title: String,
    pub content: String,
    pub keywords: String,
}

/// A work order or a project. Both carry technology and skill tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemCandidate {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub technologies: TagList,
    pub skills: TagList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum CandidateItem {
    Component(ComponentCandidate),
    WorkOrder(WorkItemCandidate),
    Project(WorkItemCandidate),
}

impl CandidateItem {
    pub fn item_type(&self) -> ItemType {
        match self {
            CandidateItem::Component(_) => ItemType::Component,
            CandidateItem::WorkOrder(_) => ItemType::WorkOrder,
            CandidateItem::Project(_) => ItemType::Project,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CandidateItem::Component(c) => &c.title,
            CandidateItem::WorkOrder(w) | CandidateItem::Project(w) => &w.title,
        }
    }

    /// Descriptive body: component content or work-item description.
    pub fn content(&self) -> &str {
        match self {
            CandidateItem::Component(c) => &c.content,
            CandidateItem::WorkOrder(w) | CandidateItem::Project(w) => &w.description,
        }
    }

    /// Lower-cased title + content + keyword/technology/skill fields.
    pub fn searchable_text(&self) -> String {
        match self {
            CandidateItem::Component(c) => {
                format!("{} {} {}", c.title, c.content, c.keywords).to_lowercase()
            }
            CandidateItem::WorkOrder(w) | CandidateItem::Project(w) => format!(
                "{} {} {} {}",
                w.title,
                w.description,
                w.technologies.search_fragment(),
                w.skills.search_fragment()
            )
            .to_lowercase(),
        }
    }

    /// Text submitted to the embedding model.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title(), self.content())
    }

    /// Technology tags; always empty for components.
    pub fn technology_tags(&self) -> &TagList {
        match self {
            CandidateItem::Component(_) => &EMPTY_TAGS,
            CandidateItem::WorkOrder(w) | CandidateItem::Project(w) => &w.technologies,
        }
    }

    /// Skill tags; always empty for components.
    pub fn skill_tags(&self) -> &TagList {
        match self {
            CandidateItem::Component(_) => &EMPTY_TAGS,
            CandidateItem::WorkOrder(w) | CandidateItem::Project(w) => &w.skills,
        }
    }
}

impl From<&ComponentRow> for CandidateItem {
    fn from(row: &ComponentRow) -> Self {
        CandidateItem::Component(ComponentCandidate {
            id: row.id,
            section_type: row.section_type.clone(),
            title: row.title.clone(),
            content: row.content.clone(),
            keywords: row.keywords.clone().unwrap_or_default(),
        })
    }
}

impl From<&WorkOrderRow> for CandidateItem {
    fn from(row: &WorkOrderRow) -> Self {
        CandidateItem::WorkOrder(WorkItemCandidate {
            id: row.id,
            title: row.title.clone(),
            description: row.work_description.clone().unwrap_or_default(),
            technologies: TagList::from_column(row.technologies_used.as_deref()),
            skills: TagList::from_column(row.skills_demonstrated.as_deref()),
        })
    }
}

impl From<&ProjectRow> for CandidateItem {
    fn from(row: &ProjectRow) -> Self {
        let description = row
            .project_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(row.project_summary.as_deref())
            .unwrap_or_default()
            .to_string();
        CandidateItem::Project(WorkItemCandidate {
            id: row.id,
            title: row.project_name.clone(),
            description,
            technologies: TagList::from_column(row.technologies_used.as_deref()),
            skills: TagList::from_column(row.skills_demonstrated.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn work_order(technologies: TagList) -> CandidateItem {
        CandidateItem::WorkOrder(WorkItemCandidate {
            id: 7,
            title: "POS Register Install".to_string(),
            description: "Replaced pin pads".to_string(),
            technologies,
            skills: TagList::Parsed(vec!["Hardware Installation".to_string()]),
        })
    }

    #[test]
    fn test_tag_list_decodes_json_array() {
        let tags = TagList::from_column(Some(r#"["Windows", "HP"]"#));
        assert_eq!(
            tags.tags(),
            Some(&["Windows".to_string(), "HP".to_string()][..])
        );
    }

    #[test]
    fn test_tag_list_null_and_blank_are_empty() {
        assert_eq!(TagList::from_column(None), TagList::Parsed(vec![]));
        assert_eq!(TagList::from_column(Some("  ")), TagList::Parsed(vec![]));
    }

    #[test]
    fn test_tag_list_keeps_malformed_text() {
        let tags = TagList::from_column(Some("Windows, HP"));
        assert!(tags.tags().is_none());
        assert_eq!(tags.search_fragment(), "Windows, HP");
    }

    #[test]
    fn test_component_has_no_tags() {
        let component = CandidateItem::Component(ComponentCandidate {
            id: 1,
            section_type: "technical_skills".to_string(),
            title: "Windows".to_string(),
            content: "Imaging".to_string(),
            keywords: "windows".to_string(),
        });
        assert_eq!(component.technology_tags().tags(), Some(&[][..]));
        assert_eq!(component.skill_tags().tags(), Some(&[][..]));
        assert_eq!(component.item_type(), ItemType::Component);
    }

    #[test]
    fn test_work_item_searchable_text_includes_tags_lowercased() {
        let item = work_order(TagList::Parsed(vec!["POS Systems".to_string()]));
        let text = item.searchable_text();
        assert!(text.contains("pos register install"));
        assert!(text.contains("pos systems"));
        assert!(text.contains("hardware installation"));
    }

    #[test]
    fn test_embedding_text_is_title_and_content() {
        let item = work_order(TagList::Parsed(vec![]));
        assert_eq!(item.embedding_text(), "POS Register Install Replaced pin pads");
    }

    #[test]
    fn test_candidate_serializes_with_item_type_tag() {
        let item = work_order(TagList::Malformed("oops".to_string()));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["item_type"], json!("work_order"));
        assert_eq!(value["technologies"], json!("oops"));
        assert_eq!(value["skills"], json!(["Hardware Installation"]));
    }
}
