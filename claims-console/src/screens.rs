//! Table definitions for each list screen.

use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::ConsoleError;
use crate::models::{MasterEntity, Permission, Role, UserSummary};
use crate::projection::{DisplayRow, parse_timestamp};
use crate::status::StatusKey;
use crate::table::{SortDirection, SortValue, TableSpec, contains_ci, number, text};

/// Active/inactive filter shared by the admin screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFilter {
    Active,
    Inactive,
}

impl ActiveFilter {
    pub fn accepts(self, is_active: bool) -> bool {
        match self {
            ActiveFilter::Active => is_active,
            ActiveFilter::Inactive => !is_active,
        }
    }
}

impl FromStr for ActiveFilter {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ActiveFilter::Active),
            "inactive" => Ok(ActiveFilter::Inactive),
            other => Err(ConsoleError::Config(format!(
                "unknown status filter '{other}', expected active or inactive"
            ))),
        }
    }
}

fn active_label(is_active: bool) -> &'static str {
    if is_active { "Active" } else { "Inactive" }
}

fn epoch(timestamp: Option<&str>) -> Option<f64> {
    timestamp
        .and_then(parse_timestamp)
        .map(|ts| ts.and_utc().timestamp() as f64)
}

/// Generates `FromStr` for a sort-key enum from its snake_case names.
macro_rules! sort_keys {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const NAMES: &'static [&'static str] = &[$($text),+];
        }

        impl FromStr for $name {
            type Err = ConsoleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ConsoleError::Config(format!(
                        "unknown sort key '{other}', expected one of: {}",
                        Self::NAMES.join(", ")
                    ))),
                }
            }
        }
    };
}

sort_keys!(ClaimSortKey {
    ClaimNumber => "claim_number",
    Customer => "customer",
    ClaimType => "claim_type",
    IncidentDate => "incident_date",
    Amount => "amount",
    Status => "status",
});

pub struct ClaimsTable;

impl TableSpec for ClaimsTable {
    type Row = DisplayRow;
    type SortKey = ClaimSortKey;
    type Filter = StatusKey;

    fn default_sort() -> (ClaimSortKey, SortDirection) {
        (ClaimSortKey::IncidentDate, SortDirection::Desc)
    }

    fn matches_search(row: &DisplayRow, needle: &str) -> bool {
        [
            &row.claim_number,
            &row.customer_name,
            &row.policy_number,
            &row.vehicle,
            &row.claim_type,
        ]
        .iter()
        .any(|field| contains_ci(field, needle))
    }

    fn matches_filter(row: &DisplayRow, filter: &StatusKey) -> bool {
        row.status == *filter
    }

    fn sort_value(row: &DisplayRow, key: ClaimSortKey) -> SortValue<'_> {
        match key {
            ClaimSortKey::ClaimNumber => text(&row.claim_number),
            ClaimSortKey::Customer => text(&row.customer_name),
            ClaimSortKey::ClaimType => text(&row.claim_type),
            ClaimSortKey::IncidentDate => {
                number(row.incident_at.map(|ts| ts.and_utc().timestamp() as f64))
            }
            ClaimSortKey::Amount => number(row.amount),
            ClaimSortKey::Status => text(row.status.label()),
        }
    }
}

sort_keys!(UserSortKey {
    Username => "username",
    Email => "email",
    Role => "role",
    Status => "status",
});

pub struct UsersTable;

impl TableSpec for UsersTable {
    type Row = UserSummary;
    type SortKey = UserSortKey;
    type Filter = ActiveFilter;

    fn default_sort() -> (UserSortKey, SortDirection) {
        (UserSortKey::Username, SortDirection::Asc)
    }

    fn matches_search(row: &UserSummary, needle: &str) -> bool {
        contains_ci(&row.username, needle)
            || contains_ci(&row.email, needle)
            || contains_ci(&row.first_name, needle)
            || contains_ci(&row.last_name, needle)
            || contains_ci(&row.display_name(), needle)
    }

    fn matches_filter(row: &UserSummary, filter: &ActiveFilter) -> bool {
        filter.accepts(row.is_active())
    }

    fn sort_value(row: &UserSummary, key: UserSortKey) -> SortValue<'_> {
        match key {
            UserSortKey::Username => text(&row.username),
            UserSortKey::Email => text(&row.email),
            UserSortKey::Role => text(&row.role),
            UserSortKey::Status => text(&row.status),
        }
    }
}

sort_keys!(RoleSortKey {
    Name => "name",
    Description => "description",
    PermissionCount => "permission_count",
    Status => "status",
    CreatedDate => "created_date",
});

pub struct RolesTable;

impl TableSpec for RolesTable {
    type Row = Role;
    type SortKey = RoleSortKey;
    type Filter = ActiveFilter;

    fn default_sort() -> (RoleSortKey, SortDirection) {
        (RoleSortKey::Name, SortDirection::Asc)
    }

    fn default_filter() -> Option<ActiveFilter> {
        Some(ActiveFilter::Active)
    }

    fn matches_search(row: &Role, needle: &str) -> bool {
        contains_ci(&row.name, needle) || contains_ci(&row.description, needle)
    }

    fn matches_filter(row: &Role, filter: &ActiveFilter) -> bool {
        filter.accepts(row.is_active)
    }

    fn sort_value(row: &Role, key: RoleSortKey) -> SortValue<'_> {
        match key {
            RoleSortKey::Name => text(&row.name),
            RoleSortKey::Description => text(&row.description),
            RoleSortKey::PermissionCount => number(row.permission_count.map(|n| n as f64)),
            RoleSortKey::Status => text(active_label(row.is_active)),
            RoleSortKey::CreatedDate => number(epoch(row.created_date.as_deref())),
        }
    }
}

sort_keys!(PermissionSortKey {
    Name => "name",
    Module => "module",
    Status => "status",
    CreatedDate => "created_date",
});

pub struct PermissionsTable;

impl TableSpec for PermissionsTable {
    type Row = Permission;
    type SortKey = PermissionSortKey;
    type Filter = ActiveFilter;

    fn default_sort() -> (PermissionSortKey, SortDirection) {
        (PermissionSortKey::Name, SortDirection::Asc)
    }

    fn matches_search(row: &Permission, needle: &str) -> bool {
        contains_ci(&row.codename, needle)
            || contains_ci(&row.name, needle)
            || contains_ci(&row.module, needle)
    }

    fn matches_filter(row: &Permission, filter: &ActiveFilter) -> bool {
        filter.accepts(row.is_active)
    }

    fn sort_value(row: &Permission, key: PermissionSortKey) -> SortValue<'_> {
        match key {
            PermissionSortKey::Name => text(&row.name),
            PermissionSortKey::Module => text(&row.module),
            PermissionSortKey::Status => text(active_label(row.is_active)),
            PermissionSortKey::CreatedDate => number(epoch(row.created_date.as_deref())),
        }
    }
}

sort_keys!(MasterSortKey {
    Key => "key",
    Value => "value",
    Status => "status",
    CreatedDate => "created_date",
});

/// One table definition for all four master-data screens.
pub struct MasterTable<E>(PhantomData<fn() -> E>);

impl<E: MasterEntity> TableSpec for MasterTable<E> {
    type Row = E;
    type SortKey = MasterSortKey;
    type Filter = ActiveFilter;

    fn default_sort() -> (MasterSortKey, SortDirection) {
        (MasterSortKey::Key, SortDirection::Asc)
    }

    fn matches_search(row: &E, needle: &str) -> bool {
        contains_ci(row.natural_key(), needle)
            || row.description().is_some_and(|d| contains_ci(d, needle))
    }

    fn matches_filter(row: &E, filter: &ActiveFilter) -> bool {
        filter.accepts(row.is_active())
    }

    fn sort_value(row: &E, key: MasterSortKey) -> SortValue<'_> {
        match key {
            MasterSortKey::Key => text(row.natural_key()),
            MasterSortKey::Value => match row.value_number() {
                Some(n) => number(n),
                None => SortValue::Text(row.value_text().into()),
            },
            MasterSortKey::Status => text(active_label(row.is_active())),
            MasterSortKey::CreatedDate => number(epoch(row.created_date())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::master::MasterRecord;
    use crate::models::{ClaimRecord, DamageCode, PricingConfig, PricingValueType};
    use crate::projection::project_claims;
    use crate::status::StatusContext;
    use crate::table::TableState;

    fn claims() -> Vec<DisplayRow> {
        let records: Vec<ClaimRecord> = [
            ("1", "CLM-001", "Sarah Mitchell", "Closed Damage Detection", "2024-01-10T10:00:00", 4500.0),
            ("2", "CLM-002", "Anan Chai", "Fraudulent", "2024-01-12T10:00:00", 12000.0),
            ("3", "CLM-003", "Mark Chen", "Open", "2024-01-11T10:00:00", 800.0),
            ("4", "CLM-004", "Priya Rao", "weird", "2024-01-09T10:00:00", 2300.0),
        ]
        .into_iter()
        .map(|(id, number, customer, status, incident, amount)| ClaimRecord {
            id: id.into(),
            complaint_id: Some(number.into()),
            policy_holder_name: Some(customer.into()),
            status: Some(status.into()),
            incident_date_time: Some(incident.into()),
            claim_amount: Some(amount),
            ..Default::default()
        })
        .collect();
        project_claims(&records, StatusContext::ClaimsList)
    }

    #[test]
    fn claims_default_to_latest_incident_first() {
        let rows = claims();
        let state = TableState::<ClaimsTable>::new();
        let ids: Vec<_> = state.apply(&rows).rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn claims_filter_by_canonical_status() {
        let rows = claims();
        let mut state = TableState::<ClaimsTable>::new();
        state.set_filter(Some(StatusKey::Pending));
        let page = state.apply(&rows);
        assert_eq!(page.meta.total_count, 1);
        assert_eq!(page.rows[0].customer_name, "Priya Rao");
    }

    #[test]
    fn claims_search_and_amount_sort() {
        let rows = claims();
        let mut state = TableState::<ClaimsTable>::new();
        state.sort_by(ClaimSortKey::Amount);
        let amounts: Vec<_> = state.apply(&rows).rows.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![800.0, 2300.0, 4500.0, 12000.0]);

        state.set_search("chen");
        let page = state.apply(&rows);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].claim_number, "CLM-003");
    }

    #[test]
    fn roles_default_to_active_only() {
        let roles: Vec<Role> = serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "admin", "description": "Full access", "is_active": true, "permission_count": 40 },
            { "id": 2, "name": "auditor", "description": "Read only", "is_active": false, "permission_count": 5 },
            { "id": 3, "name": "adjuster", "description": "Claims handling", "is_active": true, "permission_count": 12 }
        ]))
        .unwrap();
        let mut state = TableState::<RolesTable>::new();
        assert_eq!(state.filter(), Some(&ActiveFilter::Active));
        let names: Vec<_> = state.apply(&roles).rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["adjuster", "admin"]);

        state.set_filter(None);
        state.set_sort(RoleSortKey::PermissionCount, SortDirection::Desc);
        let names: Vec<_> = state.apply(&roles).rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "adjuster", "auditor"]);
    }

    #[test]
    fn master_table_sorts_numeric_values() {
        let codes = vec![
            DamageCode {
                damage_id: "1".into(),
                damage_type: "Windshield".into(),
                severity_percentage: 40.0,
                is_active: true,
                created_date: None,
                created_by: None,
            },
            DamageCode {
                damage_id: "2".into(),
                damage_type: "Bumper".into(),
                severity_percentage: 5.0,
                is_active: false,
                created_date: None,
                created_by: None,
            },
        ];
        let mut state = TableState::<MasterTable<DamageCode>>::new();
        state.sort_by(MasterSortKey::Value);
        let keys: Vec<_> = state.apply(&codes).rows.iter().map(|r| r.natural_key()).collect();
        assert_eq!(keys, vec!["Bumper", "Windshield"]);

        state.set_filter(Some(ActiveFilter::Active));
        assert_eq!(state.apply(&codes).meta.total_count, 1);
    }

    #[test]
    fn master_search_covers_description() {
        let configs = vec![PricingConfig {
            config_id: "1".into(),
            config_key: "simple_claim_max".into(),
            config_name: "Simple claim max".into(),
            config_value: "5000".into(),
            config_type: PricingValueType::Number,
            description: "Upper bound for straight-through payouts".into(),
            is_active: true,
            created_date: None,
            created_by: None,
            updated_date: None,
            updated_by: None,
        }];
        let mut state = TableState::<MasterTable<PricingConfig>>::new();
        state.set_search("PAYOUTS");
        assert_eq!(state.apply(&configs).rows.len(), 1);
    }

    #[test]
    fn sort_keys_parse_from_cli_text() {
        assert_eq!("Incident_Date".parse::<ClaimSortKey>().unwrap(), ClaimSortKey::IncidentDate);
        assert!("price".parse::<MasterSortKey>().is_err());
        assert_eq!("inactive".parse::<ActiveFilter>().unwrap(), ActiveFilter::Inactive);
    }
}
