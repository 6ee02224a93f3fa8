//! Automatic project grouping: clusters unassigned work orders by company and calendar quarter.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Smallest cluster that becomes a project.
pub const MIN_GROUP_SIZE: usize = 3;

/// The slice of a work order that grouping looks at.
#[derive(Debug, Clone)]
pub struct GroupableWorkOrder {
    pub id: i64,
    pub company_name: String,
    pub service_date: NaiveDate,
    pub pay_amount: Option<f64>,
    pub work_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectProposal {
    pub company_name: String,
    pub year: i32,
    pub quarter: u32, // 1 – 4
    pub project_name: String,
    pub project_description: String,
    pub project_summary: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_earnings: f64,
    pub work_order_ids: Vec<i64>,
}

/// Calendar quarter (1 – 4) of a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month0() / 3) + 1
}

/// Groups work orders by `(company, year, quarter)` and proposes one project per group of at
/// least `MIN_GROUP_SIZE`. Proposals come out ordered by company, year, quarter.
pub fn propose_projects(work_orders: &[GroupableWorkOrder]) -> Vec<ProjectProposal> {
    let mut groups: BTreeMap<(&str, i32, u32), Vec<&GroupableWorkOrder>> = BTreeMap::new();
    for wo in work_orders {
        let key = (
            wo.company_name.as_str(),
            wo.service_date.year(),
            quarter_of(wo.service_date),
        );
        groups.entry(key).or_default().push(wo);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= MIN_GROUP_SIZE)
        .filter_map(|((company, year, quarter), members)| {
            build_proposal(company, year, quarter, &members)
        })
        .collect()
}

fn build_proposal(
    company: &str,
    year: i32,
    quarter: u32,
    members: &[&GroupableWorkOrder],
) -> Option<ProjectProposal> {
    let start_date = members.iter().map(|wo| wo.service_date).min()?;
    let end_date = members.iter().map(|wo| wo.service_date).max()?;
    let total_earnings: f64 = members.iter().filter_map(|wo| wo.pay_amount).sum();

    let mut categories: Vec<&str> = Vec::new();
    for category in members.iter().filter_map(|wo| wo.work_category.as_deref()) {
        if !category.is_empty() && !categories.contains(&category) {
            categories.push(category);
        }
    }
    let categories = if categories.is_empty() {
        "general".to_string()
    } else {
        categories.join(", ")
    };

    let period = format!("Q{quarter} {year}");
    Some(ProjectProposal {
        company_name: company.to_string(),
        year,
        quarter,
        project_name: format!("{company} - {period} Support"),
        project_description: format!(
            "Comprehensive technical support services for {company} during {period}"
        ),
        project_summary: format!(
            "Provided {} technical support services across {categories} with total value of ${total_earnings:.2}",
            members.len()
        ),
        start_date,
        end_date,
        total_earnings,
        work_order_ids: members.iter().map(|wo| wo.id).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_work_order(
        id: i64,
        company: &str,
        date: &str,
        pay: Option<f64>,
        category: Option<&str>,
    ) -> GroupableWorkOrder {
        GroupableWorkOrder {
            id,
            company_name: company.to_string(),
            service_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            pay_amount: pay,
            work_category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_quarter_boundaries() {
        let q = |d: &str| quarter_of(NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap());
        assert_eq!(q("2023-01-01"), 1);
        assert_eq!(q("2023-03-31"), 1);
        assert_eq!(q("2023-04-01"), 2);
        assert_eq!(q("2023-12-31"), 4);
    }

    #[test]
    fn test_group_of_three_becomes_project() {
        let orders = vec![
            make_work_order(1, "Acme", "2023-02-10", Some(100.0), Some("desktop")),
            make_work_order(2, "Acme", "2023-01-05", Some(50.5), Some("printers")),
            make_work_order(3, "Acme", "2023-03-20", None, Some("desktop")),
        ];
        let proposals = propose_projects(&orders);

        assert_eq!(proposals.len(), 1);
        let p = &proposals[0];
        assert_eq!(p.project_name, "Acme - Q1 2023 Support");
        assert_eq!(p.start_date.to_string(), "2023-01-05");
        assert_eq!(p.end_date.to_string(), "2023-03-20");
        assert_eq!(p.total_earnings, 150.5);
        assert_eq!(p.work_order_ids, vec![1, 2, 3]);
        assert_eq!(
            p.project_summary,
            "Provided 3 technical support services across desktop, printers with total value of $150.50"
        );
    }

    #[test]
    fn test_small_groups_are_skipped() {
        let orders = vec![
            make_work_order(1, "Acme", "2023-02-10", None, None),
            make_work_order(2, "Acme", "2023-02-11", None, None),
            // Different quarter
            make_work_order(3, "Acme", "2023-04-01", None, None),
        ];
        assert!(propose_projects(&orders).is_empty());
    }

    #[test]
    fn test_groups_split_by_company_and_ordered() {
        let mut orders = Vec::new();
        for i in 0..3 {
            orders.push(make_work_order(i, "Zenith", "2022-11-01", Some(10.0), None));
            orders.push(make_work_order(10 + i, "Acme", "2023-05-01", Some(10.0), None));
        }
        let proposals = propose_projects(&orders);
        let names: Vec<&str> = proposals.iter().map(|p| p.project_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Acme - Q2 2023 Support", "Zenith - Q4 2022 Support"]
        );
        assert!(proposals[0].project_summary.contains("across general"));
    }
}
