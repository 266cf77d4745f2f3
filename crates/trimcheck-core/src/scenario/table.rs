//! The built-in scenario table, grouped by endpoint category

use serde_json::json;

use super::skip::{
    AWS_CREDENTIALS, MACHINE_CONFIG_MISSING, MATERIAL_GROUPS_MISSING, MISSING_CAMPAIGN_DATA,
    OPTIMISER_SETUP_MISSING, PARAMETERS_ABSENT, PARAMETERS_BUCKET, PLANNER_DATA_MISSING,
    PRODUCTION_DATA_MISSING, SALES_FORECAST_MISSING, SOLVER_LICENSE, SOURCE_OF_TRUTH_MISSING,
    USER_NOT_FOUND,
};
use super::{LoadPlan, Mode, Scenario, SetupStep};
use crate::fixture::EntityKind::{
    CampaignChangeSet, CampaignPlan, CampaignSuggestion, CampaignVersion, Machine, Optimization,
    Planner, ResultsUpdate, RollsPlanned, SalesForecast, Scheduler, SecondaryData, SelectedOrders,
    SlittingOrders, User,
};
use crate::fixture::Variant::{
    InvalidType, MissingRequired, Valid, ValidMetallizer, ValidPrimary, ValidSecondary,
};

const PLACEHOLDER_PLAN_ID: &str = "test-plan-id-12345";
const PLACEHOLDER_CAMPAIGN_ID: &str = "test-campaign-id-12345";

const SCHEDULER_KEYS: &[&str] = &["planId", "scheduled_plan", "clientId", "deckle_orders"];
const PLANNER_KEYS: &[&str] = &["planId", "campaign_plan", "clientId"];

/// Every built-in scenario, in execution order
#[must_use]
pub fn builtin() -> Vec<Scenario> {
    [
        health(),
        optimization(),
        optimization_data(),
        scheduling(),
        planning(),
        campaign(),
        user_machine(),
        file_processing(),
        misc(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn health() -> Vec<Scenario> {
    vec![
        Scenario::get("health_check", "/")
            .success()
            .text_contains_any(&["200", "ok"])
            .within_ms(5_000),
        Scenario::get("health_check_error_handling", "/").liveness(&[200, 500]),
        Scenario::get("health_check_with_parameters", "/")
            .liveness(&[200, 400])
            .query(&[("format", "json"), ("verbose", "true")]),
        Scenario::get("health_check_load", "/")
            .liveness(&[200])
            .mode(Mode::Load(LoadPlan::default())),
    ]
}

fn optimization() -> Vec<Scenario> {
    vec![
        // ── Missing / malformed input ──
        Scenario::post("optimise_metallizer_missing_params", "/api/optimise_metallizer")
            .fixture(Optimization, MissingRequired)
            .expect(&[400, 500]),
        Scenario::post("optimise_metallizer_invalid_data", "/api/optimise_metallizer")
            .fixture(Optimization, InvalidType)
            .expect(&[400, 500]),
        Scenario::post("optimise_setting_missing_params", "/api/optimise_setting")
            .fixture(Optimization, MissingRequired)
            .expect(&[400]),
        Scenario::post("optimise_setting_invalid_data", "/api/optimise_setting")
            .literal(json!({"company": "CPFL", "max_width": "invalid"}))
            .expect(&[400, 500]),
        Scenario::post("optimise_wastage_missing_params", "/api/optimise_wastage")
            .fixture(Optimization, MissingRequired)
            .expect(&[400]),
        Scenario::post("optimise_wastage_invalid_data", "/api/optimise_wastage")
            .literal(json!({"company": "CPFL", "max_width": null, "minimum_trim": null}))
            .expect(&[400, 500]),
        Scenario::post("optimise_hybrid_missing_params", "/api/optimise_hybrid")
            .fixture(Optimization, MissingRequired)
            .expect(&[400]),
        Scenario::post("optimise_hybrid_invalid_data", "/api/optimise_hybrid")
            .literal(json!({
                "company": "CPFL",
                "max_width": "not_a_number",
                "minimum_trim": "not_a_number",
            }))
            .expect(&[400, 500]),
        // ── Machine-category handling ──
        Scenario::post("optimise_setting_primary_no_secondary_params", "/api/optimise_setting")
            .fixture(Optimization, ValidPrimary)
            .liveness(&[200, 400, 500]),
        Scenario::post("optimise_setting_secondary_with_params", "/api/optimise_setting")
            .fixture(Optimization, ValidSecondary)
            .liveness(&[200, 400, 500]),
        Scenario::post("optimise_metallizer_with_params", "/api/optimise_metallizer")
            .fixture(Optimization, ValidMetallizer)
            .liveness(&[200, 400, 500]),
        // ── Success ──
        Scenario::post("optimise_metallizer_success", "/api/optimise_metallizer")
            .fixture(Optimization, ValidMetallizer)
            .success()
            .object_with(&[])
            .skip(&[SOLVER_LICENSE]),
        Scenario::post("optimise_setting_success", "/api/optimise_setting")
            .fixture(Optimization, ValidPrimary)
            .success()
            .object_or_array()
            .skip(&[SOLVER_LICENSE, PRODUCTION_DATA_MISSING]),
        Scenario::post("optimise_wastage_success", "/api/optimise_wastage")
            .fixture(Optimization, ValidPrimary)
            .success()
            .object_or_array()
            .skip(&[SOLVER_LICENSE]),
        Scenario::post("optimise_hybrid_success", "/api/optimise_hybrid")
            .fixture(Optimization, ValidPrimary)
            .success()
            .object_or_array()
            .skip(&[SOLVER_LICENSE]),
    ]
}

/// Result retrieval endpoints filed under optimization
fn optimization_data() -> Vec<Scenario> {
    vec![
        Scenario::get("fetch_plan_data_missing_params", "/api/fetch_plan_data").expect(&[400]),
        Scenario::get("fetch_plan_data_invalid_algorithm", "/api/fetch_plan_data")
            .query(&[
                ("algorithm", "invalid_algorithm"),
                ("company", "CPFL"),
                ("product_name", "PROD1"),
                ("product_config", "CONFIG1"),
                ("machine_type", "Primary"),
                ("plant", "AMD"),
            ])
            .expect(&[400]),
        Scenario::get("fetch_plan_data_success", "/api/fetch_plan_data")
            .query(&[
                ("algorithm", "setting"),
                ("company", "CPFL"),
                ("product_name", "CB10NB"),
                ("product_config", "100_200_870"),
                ("machine_type", "Primary"),
                ("plant", "AMD"),
            ])
            .success()
            .object_or_array(),
        Scenario::get("fetch_plan_data_unknown_machine", "/api/fetch_plan_data")
            .query(&[
                ("algorithm", "setting"),
                ("company", "CPFL"),
                ("product_name", "PROD1"),
                ("product_config", "CONFIG1"),
                ("machine_type", "AB100"),
                ("plant", "AMD"),
            ])
            .liveness(&[200, 400, 404, 500]),
        Scenario::get("comparison_missing_params", "/api/comparison").expect(&[400]),
        Scenario::get("comparison_success", "/api/comparison")
            .query(&[
                ("company", "CPFL"),
                ("machine_type", "AB100"),
                ("product_type", "CB10NB"),
                ("product_config", "100_220_300"),
                ("plant", "AMD"),
            ])
            .success()
            .object_with(&["setting", "wastage", "hybrid"])
            .allow_empty(),
        Scenario::get("comparison_unavailable", "/api/comparison")
            .query(&[
                ("company", "CPFL"),
                ("machine_type", "Primary"),
                ("product_type", "PROD1"),
                ("product_config", "CONFIG1"),
                ("plant", "AMD"),
            ])
            .liveness(&[200, 400, 500]),
        Scenario::get("product_results_missing_params", "/api/product_results").expect(&[400]),
        Scenario::get("product_results_success", "/api/product_results")
            .query(&[("company", "CPFL"), ("machine_type", "AB100"), ("plant", "AMD")])
            .success()
            .object_with(&["products"]),
        Scenario::get("product_results_unavailable", "/api/product_results")
            .query(&[("company", "CPFL"), ("machine_type", "Primary"), ("plant", "AMD")])
            .liveness(&[200, 404, 500]),
        Scenario::post("update_results_missing_params", "/api/update_results")
            .fixture(ResultsUpdate, MissingRequired)
            .expect(&[400, 500]),
        Scenario::post("update_results_invalid_data", "/api/update_results")
            .fixture(ResultsUpdate, InvalidType)
            .expect(&[400, 500]),
        Scenario::post("update_results_success", "/api/update_results")
            .fixture(ResultsUpdate, Valid)
            .success()
            .object_with(&["customer", "metric", "plan"]),
    ]
}

fn scheduling() -> Vec<Scenario> {
    vec![
        Scenario::post("changover_scheduler_missing_params", "/api/changover_scheduler")
            .fixture(Scheduler, MissingRequired)
            .expect(&[400]),
        Scenario::post("changover_scheduler_no_orders", "/api/changover_scheduler")
            .literal(json!({"client_name": "CPFL", "data": {"summarized_orders": {}}}))
            .expect(&[400]),
        Scenario::post("changover_scheduler_invalid_data", "/api/changover_scheduler")
            .fixture(Scheduler, InvalidType)
            .expect(&[400, 500]),
        Scenario::post("hybrid_scheduler_missing_params", "/api/hybrid_scheduler")
            .fixture(Scheduler, MissingRequired)
            .expect(&[400]),
        Scenario::post("otif_scheduler_missing_params", "/api/otif_scheduler")
            .fixture(Scheduler, MissingRequired)
            .expect(&[400]),
        Scenario::post("hybrid_scheduler_success", "/api/hybrid_scheduler")
            .fixture(Scheduler, Valid)
            .success()
            .object_with(SCHEDULER_KEYS)
            .skip(&[MISSING_CAMPAIGN_DATA]),
        Scenario::post("otif_scheduler_success", "/api/otif_scheduler")
            .fixture(Scheduler, Valid)
            .success()
            .object_with(SCHEDULER_KEYS)
            .skip(&[MISSING_CAMPAIGN_DATA]),
        Scenario::post("changover_scheduler_success", "/api/changover_scheduler")
            .fixture(Scheduler, Valid)
            .success()
            .object_with(&["planId", "scheduled_plan", "clientId"])
            .skip(&[MISSING_CAMPAIGN_DATA]),
        Scenario::get("fetch_scheduler_data_missing_params", "/api/fetch_scheduler_data")
            .expect(&[400]),
        Scenario::get("fetch_scheduler_data_invalid_algorithm", "/api/fetch_scheduler_data")
            .query(&[
                ("algorithm", "invalid"),
                ("client_name", "CPFL"),
                ("planId", "test-id"),
            ])
            .expect(&[400]),
        Scenario::get("fetch_scheduler_data_not_found", "/api/fetch_scheduler_data")
            .query(&[
                ("algorithm", "changeover"),
                ("client_name", "CPFL"),
                ("planId", "non-existent-id"),
            ])
            .expect(&[404, 500]),
        Scenario::get("fetch_scheduler_data_success", "/api/fetch_scheduler_data")
            .setup(
                SetupStep::post("/api/changover_scheduler", Scheduler).capture("planId", "planId"),
            )
            .query(&[
                ("algorithm", "changeover"),
                ("client_name", "CPFL"),
                ("planId", PLACEHOLDER_PLAN_ID),
            ])
            .success()
            .object_with(&[]),
    ]
}

fn planning() -> Vec<Scenario> {
    vec![
        Scenario::post("changover_planner_missing_params", "/api/changover_planner")
            .fixture(Planner, MissingRequired)
            .expect(&[400]),
        Scenario::post("changover_planner_invalid_data", "/api/changover_planner")
            .fixture(Planner, InvalidType)
            .expect(&[400, 500]),
        Scenario::get("changover_planner_get_accessible", "/api/changover_planner")
            .liveness(&[200, 400, 500]),
        Scenario::get("otif_planner_missing_data", "/api/otif_planner")
            .literal(json!({}))
            .expect(&[400, 500]),
        Scenario::get("hybrid_planner_missing_data", "/api/hybrid_planner")
            .literal(json!({}))
            .expect(&[400, 500]),
        Scenario::get("fetch_planner_data_missing_params", "/api/fetch_planner_data")
            .expect(&[400]),
        Scenario::get("fetch_planner_data_invalid_algorithm", "/api/fetch_planner_data")
            .query(&[
                ("algorithm", "invalid"),
                ("client_name", "CPFL"),
                ("planId", "test-id"),
                ("plant", "AMD"),
            ])
            .expect(&[400]),
        Scenario::get("fetch_planner_data_not_found", "/api/fetch_planner_data")
            .query(&[
                ("algorithm", "changeover"),
                ("client_name", "CPFL"),
                ("planId", "non-existent-id"),
                ("plant", "AMD"),
            ])
            .expect(&[404, 500]),
        Scenario::post("changover_planner_success", "/api/changover_planner")
            .setup(SetupStep::post("/api/save_sales_forecast", SalesForecast))
            .fixture(Planner, Valid)
            .success()
            .object_with(PLANNER_KEYS)
            .skip(&[SALES_FORECAST_MISSING, SOURCE_OF_TRUTH_MISSING]),
        // These planners are GET but read `data` from a JSON body
        Scenario::get("otif_planner_success", "/api/otif_planner")
            .project(Planner, Valid, &["data"])
            .success()
            .object_with(PLANNER_KEYS)
            .skip(&[SOLVER_LICENSE]),
        Scenario::get("hybrid_planner_success", "/api/hybrid_planner")
            .project(Planner, Valid, &["data"])
            .success()
            .object_with(PLANNER_KEYS)
            .skip(&[SOLVER_LICENSE]),
        Scenario::get("fetch_planner_data_success", "/api/fetch_planner_data")
            .setup(SetupStep::post("/api/save_sales_forecast", SalesForecast))
            .setup(SetupStep::post("/api/changover_planner", Planner).capture("planId", "planId"))
            .query(&[
                ("algorithm", "changeover"),
                ("client_name", "CPFL"),
                ("planId", PLACEHOLDER_PLAN_ID),
                ("plant", "AMD"),
            ])
            .success()
            .object_with(&[])
            .skip(&[PLANNER_DATA_MISSING]),
    ]
}

fn campaign() -> Vec<Scenario> {
    let forecast_query = [("client_name", "CPFL"), ("month", "2024-01"), ("plant", "AMD")];
    let campaign_plan_query = [
        ("client_name", "CPFL"),
        ("month_year", "2024-01"),
        ("primary_machine_name", "Machine1"),
        ("plant", "AMD"),
    ];

    vec![
        Scenario::post("save_campaign_plan_missing_params", "/api/save_campaign_plan")
            .fixture(CampaignPlan, MissingRequired)
            .expect(&[400]),
        Scenario::post("save_campaign_plan_invalid_data", "/api/save_campaign_plan")
            .fixture(CampaignPlan, InvalidType)
            .expect(&[400, 500]),
        Scenario::post("save_campaign_plan_success", "/api/save_campaign_plan")
            .fixture(CampaignPlan, Valid)
            .success()
            .object_with(&["campaign_id", "message", "s3_key"]),
        Scenario::get("fetch_campaign_plan_missing_params", "/api/fetch_campaign_plan")
            .expect(&[400]),
        Scenario::get("fetch_campaign_plan_lookup", "/api/fetch_campaign_plan")
            .query(&campaign_plan_query)
            .liveness(&[200, 404, 500]),
        Scenario::get("fetch_campaign_plan_success", "/api/fetch_campaign_plan")
            .query(&campaign_plan_query)
            .success()
            .object_or_array(),
        Scenario::get("fetch_campaign_metadata_not_found", "/api/fetch_campaign_metadata")
            .query(&[("campaign_id", "non-existent-id")])
            .expect(&[404, 500]),
        Scenario::get("fetch_campaign_metadata_success", "/api/fetch_campaign_metadata")
            .query(&[("client_name", "CPFL")])
            .success()
            .object_with(&["campaigns"]),
        Scenario::get("fetch_campaign_metadata_repeatable", "/api/fetch_campaign_metadata")
            .query(&[("client_name", "CPFL")])
            .liveness(&[200, 404, 500])
            .mode(Mode::Idempotent),
        Scenario::get("fetch_campaign_by_id_missing_params", "/api/fetch_campaign_by_id")
            .expect(&[400]),
        Scenario::get("fetch_campaign_by_id_not_found", "/api/fetch_campaign_by_id")
            .query(&[("campaign_id", "non-existent-id")])
            .expect(&[404, 500]),
        Scenario::get("fetch_campaign_by_id_success", "/api/fetch_campaign_by_id")
            .setup(
                SetupStep::post("/api/save_campaign_plan", CampaignPlan)
                    .capture("campaign_id", "campaign_id"),
            )
            .query(&[("campaign_id", PLACEHOLDER_CAMPAIGN_ID)])
            .success()
            .object_with(&["metadata", "campaign_plan"]),
        Scenario::post("save_sales_forecast_missing_params", "/api/save_sales_forecast")
            .fixture(SalesForecast, MissingRequired)
            .expect(&[400]),
        Scenario::post("save_sales_forecast_invalid_forecast", "/api/save_sales_forecast")
            .fixture(SalesForecast, InvalidType)
            .expect(&[400, 500]),
        Scenario::post("save_sales_forecast_success", "/api/save_sales_forecast")
            .fixture(SalesForecast, Valid)
            .success()
            .object_with(&["message", "key"]),
        Scenario::get("fetch_sales_forecast_missing_params", "/api/fetch_sales_forecast")
            .expect(&[400]),
        Scenario::get("fetch_sales_forecast_not_found", "/api/fetch_sales_forecast")
            .query(&[("client_name", "CPFL"), ("month", "2099-01"), ("plant", "AMD")])
            .expect(&[404, 500]),
        Scenario::get("fetch_sales_forecast_success", "/api/fetch_sales_forecast")
            .query(&forecast_query)
            .success()
            .object_or_array(),
        Scenario::get("fetch_sales_forecast_repeatable", "/api/fetch_sales_forecast")
            .query(&forecast_query)
            .liveness(&[200, 404, 500])
            .mode(Mode::Idempotent),
        Scenario::post(
            "validate_campaign_changes_missing_params",
            "/api/validate_campaign_changes",
        )
        .fixture(CampaignChangeSet, MissingRequired)
        .expect(&[400]),
        Scenario::post("validate_campaign_changes_success", "/api/validate_campaign_changes")
            .fixture(CampaignChangeSet, Valid)
            .success()
            .object_with(&[]),
        Scenario::post("apply_campaign_changes_missing_params", "/api/apply_campaign_changes")
            .fixture(CampaignSuggestion, MissingRequired)
            .expect(&[400]),
        Scenario::post("apply_campaign_changes_invalid_action", "/api/apply_campaign_changes")
            .fixture(CampaignSuggestion, InvalidType)
            .expect(&[400]),
        Scenario::post("apply_campaign_changes_success", "/api/apply_campaign_changes")
            .fixture(CampaignSuggestion, Valid)
            .success()
            .object_with(&["success", "updated_plan", "message"]),
        Scenario::post("add_version_invalid_data", "/add_version")
            .fixture(CampaignVersion, InvalidType)
            .liveness(&[200, 400, 500]),
        Scenario::post("add_version_success", "/add_version")
            .fixture(CampaignVersion, Valid)
            .success()
            .object_with(&[]),
        Scenario::get("get_campaign_details_missing_params", "/get_campaign_details")
            .expect(&[400]),
        Scenario::get("get_campaign_details_success", "/get_campaign_details")
            .query(&[("client_name", "CPFL"), ("month", "2024-01")])
            .success()
            .object_or_array(),
    ]
}

fn user_machine() -> Vec<Scenario> {
    vec![
        Scenario::post("update_details_invalid_data", "/update_details")
            .fixture(User, InvalidType)
            .liveness(&[200, 400, 500]),
        Scenario::post("update_details_success", "/update_details")
            .fixture(User, Valid)
            .success()
            .object_with(&[])
            .skip(&[AWS_CREDENTIALS]),
        Scenario::get("get_details_missing_params", "/get_details").expect(&[400]),
        Scenario::get("get_details_not_found", "/get_details")
            .query(&[("userId", "non-existent-user")])
            .expect(&[404, 500]),
        Scenario::get("get_details_success", "/get_details")
            .query(&[("userId", "test-user-123")])
            .success()
            .object_or_array()
            .skip(&[AWS_CREDENTIALS]),
        Scenario::post("add_machine_missing_params", "/add_machine")
            .fixture(Machine, MissingRequired)
            .expect(&[400, 500]),
        Scenario::post("add_machine_unknown_user", "/add_machine")
            .literal(json!({
                "userId": "non-existent-user",
                "machineType": "Primary",
                "machineCategory": "Primary",
                "maxArms": 10,
                "minArms": 2,
                "jumboWidth": 2000,
                "minTrim": 50,
                "plant": "AMD",
            }))
            .expect(&[404, 500]),
        Scenario::post("add_machine_success", "/add_machine")
            .fixture(Machine, Valid)
            .success()
            .object_with(&["success", "message"])
            .skip(&[USER_NOT_FOUND, AWS_CREDENTIALS]),
        Scenario::get("get_machine_details_missing_params", "/get_machine_details")
            .expect(&[400]),
        Scenario::get("get_machine_details_success", "/get_machine_details")
            .query(&[("company", "CPFL"), ("machineType", "AB100")])
            .success()
            .object_with(&[])
            .skip(&[MACHINE_CONFIG_MISSING]),
        Scenario::post("upload_profile_pic_missing_file", "/upload_profile_pic").expect(&[400]),
    ]
}

fn file_processing() -> Vec<Scenario> {
    let orders_query = [("client_name", "CPFL"), ("plant", "AMD")];
    let sap_query = [
        ("start_date", "2024-01-01"),
        ("end_date", "2024-01-31"),
        ("material_code", "MAT001"),
    ];

    vec![
        Scenario::post("preprocess_excel_data_missing_file", "/api/preprocess_excel_data")
            .expect(&[400]),
        Scenario::post("save_selected_orders_missing_params", "/api/save_selected_orders")
            .fixture(SelectedOrders, MissingRequired)
            .expect(&[400]),
        Scenario::post("save_selected_orders_invalid_data", "/api/save_selected_orders")
            .fixture(SelectedOrders, InvalidType)
            .expect(&[400]),
        Scenario::post("save_selected_orders_success", "/api/save_selected_orders")
            .fixture(SelectedOrders, Valid)
            .success()
            .object_with(&["success", "s3_key", "message"]),
        Scenario::get("fetch_selected_orders_missing_params", "/api/fetch_selected_orders")
            .expect(&[400]),
        Scenario::get("fetch_selected_orders_not_found", "/api/fetch_selected_orders")
            .query(&[("client_name", "NON_EXISTENT"), ("plant", "AMD")])
            .expect(&[404, 500]),
        Scenario::get("fetch_selected_orders_lookup", "/api/fetch_selected_orders")
            .query(&orders_query)
            .liveness(&[200, 404, 500])
            .object_with(&["orders", "client_name"]),
        Scenario::post("update_rolls_planned_missing_params", "/api/update_rolls_planned")
            .fixture(RollsPlanned, MissingRequired)
            .expect(&[400]),
        Scenario::post("update_rolls_planned_invalid_data", "/api/update_rolls_planned")
            .fixture(RollsPlanned, InvalidType)
            .expect(&[400]),
        Scenario::post("update_rolls_planned_success", "/api/update_rolls_planned")
            .fixture(RollsPlanned, Valid)
            .success()
            .object_with(&["success", "orders_updated", "message"]),
        Scenario::post("save_secondary_data_missing_params", "/api/save_secondary_data")
            .fixture(SecondaryData, MissingRequired)
            .expect(&[400, 500]),
        Scenario::post("save_secondary_data_empty_rows", "/api/save_secondary_data")
            .literal(json!({"secondary_data": [], "jumbo_width": 2000, "lengthMultiple": 5}))
            .expect(&[400]),
        Scenario::post("save_secondary_data_success", "/api/save_secondary_data")
            .fixture(SecondaryData, Valid)
            .success()
            .object_with(&["flattened_plan", "updated_customer", "updated_metric"])
            .skip(&[OPTIMISER_SETUP_MISSING]),
        Scenario::get("sap_data_missing_params", "/api/sap_data").expect(&[400]),
        Scenario::get("sap_data_upstream", "/api/sap_data")
            .query(&sap_query)
            .liveness(&[200, 400, 500, 502]),
        // Body format is not fixed for this endpoint; status only
        Scenario::get("sap_data_success", "/api/sap_data")
            .query(&sap_query)
            .expect(&[200]),
    ]
}

fn misc() -> Vec<Scenario> {
    let deckle_query = [("company", "CPFL"), ("material_group", "BOPP")];
    let plans_query = [
        ("material_code", "MAT001"),
        ("company", "CPFL"),
        ("machine_type", "Primary"),
        ("plant", "AMD"),
    ];

    vec![
        Scenario::post("save_slitting_orders_missing_params", "/api/save_slitting_orders")
            .fixture(SlittingOrders, MissingRequired)
            .expect(&[400]),
        Scenario::post("save_slitting_orders_invalid_time", "/api/save_slitting_orders")
            .fixture(SlittingOrders, InvalidType)
            .expect(&[400]),
        Scenario::post("save_slitting_orders_success", "/api/save_slitting_orders")
            .fixture(SlittingOrders, Valid)
            .success()
            .object_with(&["success", "s3_key", "message"]),
        Scenario::get("fetch_deckle_orders_missing_params", "/api/fetch_deckle_orders")
            .expect(&[400]),
        Scenario::get("fetch_deckle_orders_unknown_company", "/api/fetch_deckle_orders")
            .query(&[("company", "NON_EXISTENT")])
            .liveness(&[200, 404, 500]),
        Scenario::get("fetch_deckle_orders_success", "/api/fetch_deckle_orders")
            .query(&deckle_query)
            .success()
            .object_with(&[]),
        Scenario::get("fetch_deckle_orders_repeatable", "/api/fetch_deckle_orders")
            .query(&deckle_query)
            .liveness(&[200, 404, 500])
            .mode(Mode::Idempotent),
        Scenario::get("download_deckle_orders_missing_params", "/api/download_deckle_orders")
            .expect(&[400]),
        // Returns a file or JSON; status only
        Scenario::get("download_deckle_orders_success", "/api/download_deckle_orders")
            .query(&[
                ("company", "CPFL"),
                ("material_group", "BOPP"),
                ("material_code", "MAT001"),
            ])
            .expect(&[200]),
        Scenario::get("download_deckle_orders_unavailable", "/api/download_deckle_orders")
            .query(&[
                ("company", "CPFL"),
                ("material_group", "BOPP"),
                ("material_code", "MAT001"),
            ])
            .liveness(&[200, 400, 500]),
        Scenario::get("fetch_material_groups_missing_params", "/api/fetch_material_groups")
            .expect(&[400]),
        Scenario::get("fetch_material_groups_success", "/api/fetch_material_groups")
            .query(&[("company", "CPFL")])
            .success()
            .object_with(&["material_groups", "company"])
            .skip(&[MATERIAL_GROUPS_MISSING]),
        Scenario::get("fetch_material_groups_repeatable", "/api/fetch_material_groups")
            .query(&[("company", "CPFL")])
            .liveness(&[200, 404, 500])
            .mode(Mode::Idempotent),
        Scenario::get("fetch_parameters_success", "/api/fetch_parameters")
            .success()
            .object_with(&[])
            .skip(&[PARAMETERS_ABSENT, PARAMETERS_BUCKET]),
        Scenario::get(
            "fetch_plans_by_material_code_missing_params",
            "/api/fetch_plans_by_material_code",
        )
        .expect(&[400]),
        Scenario::get("fetch_plans_by_material_code_success", "/api/fetch_plans_by_material_code")
            .query(&plans_query)
            .success()
            .object_with(&["available_plans", "material_code"]),
        Scenario::get(
            "fetch_source_of_truth_orders_missing_params",
            "/api/fetch_source_of_truth_orders",
        )
        .expect(&[400]),
        Scenario::get(
            "fetch_source_of_truth_orders_not_found",
            "/api/fetch_source_of_truth_orders",
        )
        .query(&[("client_name", "NON_EXISTENT"), ("plant", "AMD")])
        .expect(&[404, 500]),
        Scenario::get("fetch_source_of_truth_orders_success", "/api/fetch_source_of_truth_orders")
            .query(&[("client_name", "CPFL"), ("plant", "AMD")])
            .success()
            .object_with(&["orders", "client_name"]),
    ]
}
