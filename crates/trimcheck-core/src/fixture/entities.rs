//! Typed request bodies and their cross-field invariants

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use super::FixtureInvariantError;
use super::orders::{self, OrderRow};

/// Cross-field checks a payload must satisfy before it is sent.
pub trait Validate {
    /// Entity name used in error reports
    const ENTITY: &'static str;

    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate(&self) -> Result<(), FixtureInvariantError>;
}

fn violation(entity: &str, rule: &str, detail: impl Into<String>) -> FixtureInvariantError {
    FixtureInvariantError {
        entity: entity.to_string(),
        rule: rule.to_string(),
        detail: detail.into(),
    }
}

fn rfc3339(entity: &str, field: &str, value: &str) -> Result<i64, FixtureInvariantError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.timestamp())
        .map_err(|e| violation(entity, "timestamp_format", format!("{field} = {value:?}: {e}")))
}

fn calendar_date(entity: &str, field: &str, value: &str) -> Result<NaiveDate, FixtureInvariantError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| violation(entity, "date_format", format!("{field} = {value:?}: {e}")))
}

fn month_year(entity: &str, field: &str, value: &str) -> Result<(), FixtureInvariantError> {
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| violation(entity, "month_format", format!("{field} = {value:?}, expected YYYY-MM")))
}

// ── Optimization ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MachineCategory {
    Primary,
    Secondary,
    Metallizer,
}

/// Body of the four `optimise_*` endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationRequest {
    pub company: String,
    pub material_type: String,
    pub machine_category: MachineCategory,
    pub max_width: u32,
    pub minimum_trim: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim_value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_multiple: Option<u32>,
    pub plant: String,
    pub email: String,
    pub is_file_upload: bool,
    pub machine_type: String,
    pub secondary_machine: String,
    pub metallizer_machine: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width_range: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width_range: Option<u32>,
    pub data: Vec<OrderRow>,
}

impl OptimizationRequest {
    fn base(category: MachineCategory, machine_type: &str, data: Vec<OrderRow>) -> Self {
        Self {
            company: "CPFL".into(),
            material_type: "BOPET".into(),
            machine_category: category,
            max_width: 8700,
            minimum_trim: 250,
            trim_value: None,
            length_multiple: None,
            plant: "AMD".into(),
            email: "abhi@gmail.com".into(),
            is_file_upload: true,
            machine_type: machine_type.into(),
            secondary_machine: "SEC01".into(),
            metallizer_machine: "MET01".into(),
            min_width_range: None,
            max_width_range: None,
            data,
        }
    }

    /// Primary slitter: no width window; trim and length multiple zeroed
    #[must_use]
    pub fn primary() -> Self {
        Self {
            trim_value: Some(0),
            length_multiple: Some(0),
            ..Self::base(MachineCategory::Primary, "PRIMARY01", orders::primary_rows())
        }
    }

    #[must_use]
    pub fn secondary() -> Self {
        Self {
            trim_value: Some(10),
            length_multiple: Some(3),
            min_width_range: Some(500),
            max_width_range: Some(1650),
            ..Self::base(MachineCategory::Secondary, "SEC01", orders::secondary_rows())
        }
    }

    #[must_use]
    pub fn metallizer() -> Self {
        Self {
            trim_value: Some(20),
            length_multiple: Some(3),
            min_width_range: Some(2700),
            max_width_range: Some(2850),
            ..Self::base(MachineCategory::Metallizer, "MET01", orders::metallizer_rows())
        }
    }
}

impl Validate for OptimizationRequest {
    const ENTITY: &'static str = "OptimizationRequest";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        let e = Self::ENTITY;
        match self.machine_category {
            MachineCategory::Primary => {
                if self.min_width_range.is_some() || self.max_width_range.is_some() {
                    return Err(violation(
                        e,
                        "primary_without_width_range",
                        "Primary machines must not carry min/max_width_range",
                    ));
                }
                if self.trim_value.unwrap_or(0) != 0 || self.length_multiple.unwrap_or(0) != 0 {
                    return Err(violation(
                        e,
                        "primary_zero_trim",
                        "Primary machines take trim_value/length_multiple as 0 or absent",
                    ));
                }
            }
            MachineCategory::Secondary | MachineCategory::Metallizer => {
                let (Some(min), Some(max), Some(_), Some(lm)) = (
                    self.min_width_range,
                    self.max_width_range,
                    self.trim_value,
                    self.length_multiple,
                ) else {
                    return Err(violation(
                        e,
                        "range_params_present",
                        format!(
                            "{:?} machines need min/max_width_range, trim_value and length_multiple",
                            self.machine_category
                        ),
                    ));
                };
                if min >= max || max > self.max_width {
                    return Err(violation(
                        e,
                        "width_range_order",
                        format!(
                            "need min_width_range < max_width_range <= max_width, got {min} / {max} / {}",
                            self.max_width
                        ),
                    ));
                }
                if lm == 0 {
                    return Err(violation(e, "length_multiple_positive", "length_multiple is 0"));
                }
            }
        }
        if self.data.is_empty() {
            return Err(violation(e, "orders_present", "data has no order rows"));
        }
        if let Some(row) = self
            .data
            .iter()
            .find(|r| r.width == 0 || r.width > self.max_width)
        {
            return Err(violation(
                e,
                "row_width",
                format!(
                    "order {} width {} outside 1..={}",
                    row.sales_order, row.width, self.max_width
                ),
            ));
        }
        Ok(())
    }
}

// ── Scheduling ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizedOrder {
    pub material_group: String,
    pub original_material_group: String,
    pub line: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignBlock {
    pub material_group: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerData {
    /// Keyed by material group
    pub summarized_orders: BTreeMap<String, Vec<SummarizedOrder>>,
    /// Keyed by production line
    pub campaign_blocks: BTreeMap<String, Vec<CampaignBlock>>,
}

/// Body of the scheduler endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerRequest {
    pub client_name: String,
    pub algorithm_name: String,
    pub month_year: String,
    pub primary_machine_name: String,
    pub data: SchedulerData,
}

impl SchedulerRequest {
    #[must_use]
    pub fn changeover() -> Self {
        let slots = [
            ("BOPP", "Line1", "2024-01-01T00:00:00Z", "2024-01-15T23:59:59Z", 1000),
            ("BOPET", "Line2", "2024-01-16T00:00:00Z", "2024-01-31T23:59:59Z", 800),
        ];

        let mut summarized_orders = BTreeMap::new();
        let mut campaign_blocks = BTreeMap::new();
        for (group, line, start, end, capacity) in slots {
            summarized_orders.insert(
                group.to_string(),
                vec![SummarizedOrder {
                    material_group: group.into(),
                    original_material_group: group.into(),
                    line: line.into(),
                    start_time: start.into(),
                    end_time: end.into(),
                    capacity,
                }],
            );
            campaign_blocks.insert(
                line.to_string(),
                vec![CampaignBlock {
                    material_group: group.into(),
                    start_time: start.into(),
                    end_time: end.into(),
                    capacity,
                }],
            );
        }

        Self {
            client_name: "CPFL".into(),
            algorithm_name: "changeover_scheduler".into(),
            month_year: "2024-01".into(),
            primary_machine_name: "PRIMARY01".into(),
            data: SchedulerData {
                summarized_orders,
                campaign_blocks,
            },
        }
    }
}

impl Validate for SchedulerRequest {
    const ENTITY: &'static str = "SchedulerRequest";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        let e = Self::ENTITY;
        month_year(e, "month_year", &self.month_year)?;
        if self.data.summarized_orders.is_empty() {
            return Err(violation(e, "orders_present", "summarized_orders is empty"));
        }
        let slots = self
            .data
            .summarized_orders
            .values()
            .flatten()
            .map(|o| (&o.start_time, &o.end_time))
            .chain(
                self.data
                    .campaign_blocks
                    .values()
                    .flatten()
                    .map(|b| (&b.start_time, &b.end_time)),
            );
        for (start, end) in slots {
            if rfc3339(e, "start_time", start)? >= rfc3339(e, "end_time", end)? {
                return Err(violation(
                    e,
                    "slot_order",
                    format!("start_time {start} is not before end_time {end}"),
                ));
            }
        }
        Ok(())
    }
}

// ── Planning ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerOrder {
    #[serde(rename = "Sales Orde")]
    pub sales_order: String,
    #[serde(rename = "SO.Qty")]
    pub ordered_qty: f64,
    #[serde(rename = "SO.Type")]
    pub order_type: String,
    #[serde(rename = "Pend. Prod")]
    pub pending_production: f64,
    #[serde(rename = "Mat.Grp.")]
    pub material_group: String,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Micron")]
    pub micron: u32,
    #[serde(rename = "Req.Del.Dt")]
    pub requested_delivery: String,
    #[serde(rename = "Prod.Statu")]
    pub production_status: String,
    #[serde(rename = "Rolls")]
    pub rolls: u32,
    #[serde(rename = "Width")]
    pub width: u32,
    #[serde(rename = "Consignee Name")]
    pub consignee: String,
    #[serde(rename = "Stock")]
    pub stock: f64,
    #[serde(rename = "Buyer Name")]
    pub buyer: String,
    #[serde(rename = "ID")]
    pub inner_diameter: u32,
    #[serde(rename = "OD")]
    pub outer_diameter: u32,
    #[serde(rename = "Item No.")]
    pub item_no: String,
    #[serde(rename = "Lenght")]
    pub length: f64,
    #[serde(rename = "New Mat.Grp.")]
    pub new_material_group: String,
}

/// Body of the planner endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerRequest {
    #[serde(rename = "monthYear")]
    pub month_year: String,
    pub plant: String,
    pub data: Vec<PlannerOrder>,
}

impl PlannerRequest {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            month_year: "2024-01".into(),
            plant: "AMD".into(),
            data: vec![PlannerOrder {
                sales_order: "SO001".into(),
                ordered_qty: 100.0,
                order_type: "ZDOM".into(),
                pending_production: 50.0,
                material_group: "MET".into(),
                material: "MAT001".into(),
                micron: 25,
                requested_delivery: "2024-01-15".into(),
                production_status: "Open".into(),
                rolls: 10,
                width: 1000,
                consignee: "Customer1".into(),
                stock: 0.0,
                buyer: "Buyer1".into(),
                inner_diameter: 500,
                outer_diameter: 800,
                item_no: "ITEM001".into(),
                length: 5000.0,
                new_material_group: "MET".into(),
            }],
        }
    }
}

impl Validate for PlannerRequest {
    const ENTITY: &'static str = "PlannerRequest";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        let e = Self::ENTITY;
        month_year(e, "monthYear", &self.month_year)?;
        if self.data.is_empty() {
            return Err(violation(e, "orders_present", "data is empty"));
        }
        for order in &self.data {
            calendar_date(e, "Req.Del.Dt", &order.requested_delivery)?;
            if order.pending_production > order.ordered_qty {
                return Err(violation(
                    e,
                    "pending_within_ordered",
                    format!(
                        "{}: Pend. Prod {} exceeds SO.Qty {}",
                        order.sales_order, order.pending_production, order.ordered_qty
                    ),
                ));
            }
        }
        Ok(())
    }
}

// ── Campaign ──

/// One line allocation in a campaign plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignEntry {
    pub material_group: String,
    pub line: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
}

impl CampaignEntry {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            material_group: "BOPP".into(),
            line: "Line1".into(),
            start_time: "2024-01-01".into(),
            end_time: "2024-01-31".into(),
            capacity: 100,
        }
    }

    fn check(&self, entity: &str) -> Result<(), FixtureInvariantError> {
        let start = calendar_date(entity, "start_time", &self.start_time)?;
        let end = calendar_date(entity, "end_time", &self.end_time)?;
        if start > end {
            return Err(violation(
                entity,
                "campaign_window",
                format!("{} on {}: {start} is after {end}", self.material_group, self.line),
            ));
        }
        if self.capacity == 0 {
            return Err(violation(
                entity,
                "capacity_positive",
                format!("{} on {} has zero capacity", self.material_group, self.line),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignPlan {
    pub client_name: String,
    pub campaign_plan: Vec<CampaignEntry>,
    pub primary_machine_name: String,
    pub month_year: String,
    pub plant: String,
}

impl CampaignPlan {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            client_name: "CPFL".into(),
            campaign_plan: vec![CampaignEntry::sample()],
            primary_machine_name: "Machine1".into(),
            month_year: "2024-01".into(),
            plant: "AMD".into(),
        }
    }
}

impl Validate for CampaignPlan {
    const ENTITY: &'static str = "CampaignPlan";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        month_year(Self::ENTITY, "month_year", &self.month_year)?;
        if self.campaign_plan.is_empty() {
            return Err(violation(Self::ENTITY, "plan_present", "campaign_plan is empty"));
        }
        self.campaign_plan
            .iter()
            .try_for_each(|c| c.check(Self::ENTITY))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastLine {
    pub group: String,
    #[serde(rename = "exportQty")]
    pub export_qty: u32,
    #[serde(rename = "domesticQty")]
    pub domestic_qty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesForecast {
    pub client_name: String,
    pub month: String,
    pub plant: String,
    pub forecast: Vec<ForecastLine>,
}

impl SalesForecast {
    #[must_use]
    pub fn sample() -> Self {
        let line = |group: &str, export_qty, domestic_qty| ForecastLine {
            group: group.into(),
            export_qty,
            domestic_qty,
        };
        Self {
            client_name: "CPFL".into(),
            month: "2024-01".into(),
            plant: "AMD".into(),
            forecast: vec![line("NTT-HS", 100, 50), line("NTT-W", 150, 75)],
        }
    }
}

impl Validate for SalesForecast {
    const ENTITY: &'static str = "SalesForecast";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        month_year(Self::ENTITY, "month", &self.month)?;
        if self.forecast.is_empty() {
            return Err(violation(Self::ENTITY, "forecast_present", "forecast is empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanChange {
    pub material_group: String,
    pub line: String,
    pub change_type: String,
    pub original: serde_json::Value,
    pub modifications: serde_json::Value,
}

/// Body of `validate_campaign_changes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignChangeSet {
    pub current_plan: Vec<CampaignEntry>,
    pub changes: Vec<PlanChange>,
    pub freeze_days: u32,
}

impl CampaignChangeSet {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            current_plan: vec![CampaignEntry::sample()],
            changes: vec![PlanChange {
                material_group: "BOPP".into(),
                line: "Line1".into(),
                change_type: "capacity_increase".into(),
                original: serde_json::json!({"capacity": 100}),
                modifications: serde_json::json!({"capacity": 150}),
            }],
            freeze_days: 3,
        }
    }
}

impl Validate for CampaignChangeSet {
    const ENTITY: &'static str = "CampaignChangeSet";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        self.current_plan
            .iter()
            .try_for_each(|c| c.check(Self::ENTITY))?;
        match self
            .changes
            .iter()
            .find(|ch| !self.current_plan.iter().any(|c| c.line == ch.line))
        {
            Some(ch) => Err(violation(
                Self::ENTITY,
                "change_targets_plan",
                format!("change on {} has no entry in current_plan", ch.line),
            )),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedPlan {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanBody {
    pub campaign_plan: Vec<CampaignEntry>,
}

/// Body of `apply_campaign_changes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSuggestion {
    pub action: String,
    pub selected_plan: SuggestedPlan,
    pub new_plans: BTreeMap<String, PlanBody>,
    pub suggestion_id: String,
}

impl CampaignSuggestion {
    #[must_use]
    pub fn sample() -> Self {
        let id = "sequence_1".to_string();
        Self {
            action: "apply_suggestion".into(),
            selected_plan: SuggestedPlan {
                id: id.clone(),
                title: "Test Plan".into(),
                description: "Test description".into(),
            },
            new_plans: BTreeMap::from([(
                id.clone(),
                PlanBody {
                    campaign_plan: vec![CampaignEntry::sample()],
                },
            )]),
            suggestion_id: id,
        }
    }
}

impl Validate for CampaignSuggestion {
    const ENTITY: &'static str = "CampaignSuggestion";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        if self.suggestion_id != self.selected_plan.id {
            return Err(violation(
                Self::ENTITY,
                "suggestion_matches_selection",
                format!(
                    "suggestion_id {} differs from selected_plan.id {}",
                    self.suggestion_id, self.selected_plan.id
                ),
            ));
        }
        let Some(plan) = self.new_plans.get(&self.suggestion_id) else {
            return Err(violation(
                Self::ENTITY,
                "suggestion_in_new_plans",
                format!("new_plans has no {}", self.suggestion_id),
            ));
        };
        plan.campaign_plan
            .iter()
            .try_for_each(|c| c.check(Self::ENTITY))
    }
}

/// Body of `add_version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignVersion {
    pub campaign_id: String,
    pub client_name: String,
    pub month: String,
    pub version: String,
    pub data: PlanBody,
}

impl CampaignVersion {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            campaign_id: "test-campaign-123".into(),
            client_name: "CPFL".into(),
            month: "2024-01".into(),
            version: "v1.0".into(),
            data: PlanBody {
                campaign_plan: vec![CampaignEntry::sample()],
            },
        }
    }
}

impl Validate for CampaignVersion {
    const ENTITY: &'static str = "CampaignVersion";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        month_year(Self::ENTITY, "month", &self.month)?;
        if self.version.trim().is_empty() {
            return Err(violation(Self::ENTITY, "version_present", "version is blank"));
        }
        if self.data.campaign_plan.is_empty() {
            return Err(violation(Self::ENTITY, "plan_present", "data.campaign_plan is empty"));
        }
        self.data
            .campaign_plan
            .iter()
            .try_for_each(|c| c.check(Self::ENTITY))
    }
}

// ── User / machine ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    #[serde(rename = "materialType")]
    pub material_type: Vec<String>,
    pub machine_type: Vec<String>,
    #[serde(rename = "expirationDate")]
    pub expiration_date: String,
}

impl UserRecord {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            user_id: "test-user-123".into(),
            username: "Test User".into(),
            email: "test@example.com".into(),
            phone: "+19999999999".into(),
            company: "CPFL".into(),
            material_type: vec!["BOPET".into()],
            machine_type: vec!["PRIMARY01".into()],
            expiration_date: "2025-12-31".into(),
        }
    }
}

impl Validate for UserRecord {
    const ENTITY: &'static str = "UserRecord";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        if !self.email.contains('@') {
            return Err(violation(
                Self::ENTITY,
                "email_format",
                format!("{:?} has no @", self.email),
            ));
        }
        calendar_date(Self::ENTITY, "expirationDate", &self.expiration_date).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRecord {
    pub user_id: String,
    pub machine_type: String,
    pub machine_category: MachineCategory,
    pub max_arms: u32,
    pub min_arms: u32,
    pub jumbo_width: u32,
    pub min_trim: u32,
    pub plant: String,
    pub secondary_machine: String,
    pub metallizer_machine: String,
}

impl MachineRecord {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            user_id: "test-user-123".into(),
            machine_type: "AB100".into(),
            machine_category: MachineCategory::Primary,
            max_arms: 10,
            min_arms: 2,
            jumbo_width: 8700,
            min_trim: 250,
            plant: "AMD".into(),
            secondary_machine: "SEC01".into(),
            metallizer_machine: "MET01".into(),
        }
    }
}

impl Validate for MachineRecord {
    const ENTITY: &'static str = "MachineRecord";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        if self.min_arms > self.max_arms {
            return Err(violation(
                Self::ENTITY,
                "arm_range",
                format!("minArms {} > maxArms {}", self.min_arms, self.max_arms),
            ));
        }
        if self.min_trim >= self.jumbo_width {
            return Err(violation(
                Self::ENTITY,
                "trim_within_jumbo",
                format!("minTrim {} >= jumboWidth {}", self.min_trim, self.jumbo_width),
            ));
        }
        Ok(())
    }
}

// ── File processing ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlitOrder {
    pub width: u32,
    pub quantity: u32,
}

/// Body of `save_slitting_orders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlittingOrderBatch {
    pub company: String,
    pub material_group: String,
    pub material_codes: Vec<String>,
    pub slitting_orders: BTreeMap<String, SlitOrder>,
    pub start_time: String,
    pub end_time: String,
    pub quantity: u32,
}

impl SlittingOrderBatch {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            company: "CPFL".into(),
            material_group: "BOPP".into(),
            material_codes: vec!["MAT001".into(), "MAT002".into()],
            slitting_orders: BTreeMap::from([
                (
                    "order1".to_string(),
                    SlitOrder {
                        width: 1000,
                        quantity: 10,
                    },
                ),
                (
                    "order2".to_string(),
                    SlitOrder {
                        width: 1200,
                        quantity: 15,
                    },
                ),
            ]),
            start_time: "2024-01-01T00:00:00Z".into(),
            end_time: "2024-01-31T23:59:59Z".into(),
            quantity: 1000,
        }
    }
}

impl Validate for SlittingOrderBatch {
    const ENTITY: &'static str = "SlittingOrderBatch";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        let e = Self::ENTITY;
        let start = rfc3339(e, "start_time", &self.start_time)?;
        let end = rfc3339(e, "end_time", &self.end_time)?;
        if start >= end {
            return Err(violation(
                e,
                "window_order",
                format!("start_time {} is not before end_time {}", self.start_time, self.end_time),
            ));
        }
        Ok(())
    }
}

/// Customer-facing row shared by the secondary and results payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRow {
    #[serde(rename = "SO")]
    pub sales_order: String,
    #[serde(rename = "WIDTH")]
    pub width: u32,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "ACTUAL ROLL")]
    pub actual_rolls: u32,
    #[serde(rename = "PROD QTY")]
    pub produced_qty: u32,
    #[serde(rename = "CUSTOMER", skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sets: Option<u32>,
}

impl CustomerRow {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            sales_order: "SO001".into(),
            width: 1000,
            material: "MAT001".into(),
            actual_rolls: 10,
            produced_qty: 100,
            customer: None,
            total_sets: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecondaryRow {
    pub merged_width: u32,
    #[serde(rename = "Sets")]
    pub sets: u32,
}

/// Body of `save_secondary_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryDataBatch {
    pub secondary_data: Vec<SecondaryRow>,
    pub customer_data: Vec<CustomerRow>,
    pub jumbo_width: u32,
    #[serde(rename = "lengthMultiple")]
    pub length_multiple: u32,
}

impl SecondaryDataBatch {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            secondary_data: vec![
                SecondaryRow {
                    merged_width: 1000,
                    sets: 9,
                },
                SecondaryRow {
                    merged_width: 1200,
                    sets: 12,
                },
            ],
            customer_data: vec![CustomerRow::sample()],
            jumbo_width: 8700,
            length_multiple: 3,
        }
    }
}

impl Validate for SecondaryDataBatch {
    const ENTITY: &'static str = "SecondaryDataBatch";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        let e = Self::ENTITY;
        if self.length_multiple == 0 {
            return Err(violation(e, "length_multiple_positive", "lengthMultiple is 0"));
        }
        for (idx, row) in self.secondary_data.iter().enumerate() {
            if row.sets % self.length_multiple != 0 {
                return Err(violation(
                    e,
                    "sets_divisible",
                    format!(
                        "row {idx}: Sets {} is not a multiple of {}",
                        row.sets, self.length_multiple
                    ),
                ));
            }
            if row.merged_width >= self.jumbo_width {
                return Err(violation(
                    e,
                    "merged_width_below_jumbo",
                    format!(
                        "row {idx}: merged_width {} >= jumbo_width {}",
                        row.merged_width, self.jumbo_width
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// A slitting pattern: total width, set count, trim and the slit widths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
    pub total_width: u32,
    pub sets: u32,
    pub trim: u32,
    pub slits: Vec<u32>,
}

impl Serialize for PlanRow {
    /// Slits are flattened into positional keys `"1"`, `"2"`, ...
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(3 + self.slits.len()))?;
        map.serialize_entry("Total width", &self.total_width)?;
        map.serialize_entry("Sets", &self.sets)?;
        map.serialize_entry("Trim", &self.trim)?;
        for (idx, slit) in self.slits.iter().enumerate() {
            map.serialize_entry(&(idx + 1).to_string(), slit)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsData {
    pub plan_data: Vec<PlanRow>,
    pub customer_data: Vec<CustomerRow>,
    pub jumbo_width: u32,
}

/// Body of `update_results`; `jumboWidth` is repeated at the top level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsUpdate {
    pub data: ResultsData,
    #[serde(rename = "jumboWidth")]
    pub jumbo_width: u32,
}

impl ResultsUpdate {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            data: ResultsData {
                plan_data: vec![PlanRow {
                    total_width: 8700,
                    sets: 10,
                    trim: 50,
                    slits: vec![4000, 4500],
                }],
                customer_data: vec![CustomerRow {
                    customer: Some("CUST1".into()),
                    ..CustomerRow::sample()
                }],
                jumbo_width: 8700,
            },
            jumbo_width: 8700,
        }
    }
}

impl Validate for ResultsUpdate {
    const ENTITY: &'static str = "ResultsUpdate";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        let e = Self::ENTITY;
        if self.jumbo_width != self.data.jumbo_width {
            return Err(violation(
                e,
                "jumbo_width_consistent",
                format!(
                    "top-level jumboWidth {} differs from data.jumboWidth {}",
                    self.jumbo_width, self.data.jumbo_width
                ),
            ));
        }
        for row in &self.data.plan_data {
            let used: u32 = row.slits.iter().sum::<u32>() + row.trim;
            if used > row.total_width {
                return Err(violation(
                    e,
                    "pattern_fits_width",
                    format!("slits + trim = {used} > Total width {}", row.total_width),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedOrder {
    #[serde(rename = "Sales Orde")]
    pub sales_order: String,
    #[serde(rename = "SO.Qty")]
    pub ordered_qty: u32,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Width")]
    pub width: u32,
}

/// Body of `save_selected_orders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedOrders {
    pub client_name: String,
    pub plant: String,
    pub month_year: String,
    pub selected_orders: Vec<SelectedOrder>,
    pub total_orders: u32,
    pub selected_count: u32,
    pub omitted_count: u32,
}

impl SelectedOrders {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            client_name: "CPFL".into(),
            plant: "AMD".into(),
            month_year: "2024-01".into(),
            selected_orders: vec![SelectedOrder {
                sales_order: "SO001".into(),
                ordered_qty: 100,
                material: "MAT001".into(),
                width: 1000,
            }],
            total_orders: 100,
            selected_count: 50,
            omitted_count: 50,
        }
    }
}

impl Validate for SelectedOrders {
    const ENTITY: &'static str = "SelectedOrders";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        month_year(Self::ENTITY, "month_year", &self.month_year)?;
        if self.selected_count + self.omitted_count != self.total_orders {
            return Err(violation(
                Self::ENTITY,
                "counts_add_up",
                format!(
                    "selected {} + omitted {} != total {}",
                    self.selected_count, self.omitted_count, self.total_orders
                ),
            ));
        }
        Ok(())
    }
}

/// Body of `update_rolls_planned`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollsPlanned {
    pub client_name: String,
    pub plant: String,
    pub material_name: String,
    pub material_group: String,
    pub run_id: String,
    pub customer_data: Vec<CustomerRow>,
}

impl RollsPlanned {
    #[must_use]
    pub fn sample() -> Self {
        Self {
            client_name: "CPFL".into(),
            plant: "AMD".into(),
            material_name: "MET".into(),
            material_group: "BOPP".into(),
            run_id: "test-run-123".into(),
            customer_data: vec![CustomerRow {
                total_sets: Some(5),
                ..CustomerRow::sample()
            }],
        }
    }
}

impl Validate for RollsPlanned {
    const ENTITY: &'static str = "RollsPlanned";

    fn validate(&self) -> Result<(), FixtureInvariantError> {
        if self.customer_data.is_empty() {
            return Err(violation(Self::ENTITY, "rows_present", "customer_data is empty"));
        }
        Ok(())
    }
}
