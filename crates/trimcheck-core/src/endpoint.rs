//! Endpoint registry: the catalog of remote operations under test
//!
//! Every other component resolves endpoints through [`EndpointRegistry`];
//! paths are never spelled out anywhere else.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// HTTP method used by an endpoint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Functional grouping of endpoints
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Optimization,
    Scheduling,
    Planning,
    Campaign,
    UserMachine,
    FileProcessing,
    Misc,
}

impl Category {
    pub const ALL: [Self; 8] = [
        Self::Health,
        Self::Optimization,
        Self::Scheduling,
        Self::Planning,
        Self::Campaign,
        Self::UserMachine,
        Self::FileProcessing,
        Self::Misc,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Optimization => "optimization",
            Self::Scheduling => "scheduling",
            Self::Planning => "planning",
            Self::Campaign => "campaign",
            Self::UserMachine => "user_machine",
            Self::FileProcessing => "file_processing",
            Self::Misc => "misc",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownCategory(s.to_string()))
    }
}

/// How the request body is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    #[default]
    Json,
    /// Multipart upload; the JSON content-type headers are not sent
    FileUpload,
}

/// One remote operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointSpec {
    pub path: String,
    pub method: HttpMethod,
    pub category: Category,
    pub requires_body: bool,
    /// Query parameters a well-formed request must carry, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_params: Vec<String>,
    #[serde(default)]
    pub encoding: BodyEncoding,
}

impl EndpointSpec {
    #[must_use]
    pub fn get(path: &str, category: Category) -> Self {
        Self {
            path: path.to_string(),
            method: HttpMethod::Get,
            category,
            requires_body: false,
            required_params: Vec::new(),
            encoding: BodyEncoding::Json,
        }
    }

    #[must_use]
    pub fn post(path: &str, category: Category) -> Self {
        Self {
            requires_body: true,
            method: HttpMethod::Post,
            ..Self::get(path, category)
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.required_params = params.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// GET endpoint that reads a JSON body
    #[must_use]
    pub fn with_body(mut self) -> Self {
        self.requires_body = true;
        self
    }

    #[must_use]
    pub fn file_upload(mut self) -> Self {
        self.encoding = BodyEncoding::FileUpload;
        self
    }

    /// `"POST /api/optimise_setting"`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    #[must_use]
    pub fn is_file_upload(&self) -> bool {
        self.encoding == BodyEncoding::FileUpload
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate endpoint: {0}")]
    DuplicateEndpoint(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Ordered, duplicate-free set of endpoints
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    specs: Vec<EndpointSpec>,
}

impl EndpointRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateEndpoint`] if (path, method) is already present.
    pub fn register(&mut self, spec: EndpointSpec) -> Result<(), RegistryError> {
        if self.get(spec.method, &spec.path).is_some() {
            return Err(RegistryError::DuplicateEndpoint(spec.label()));
        }
        self.specs.push(spec);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, method: HttpMethod, path: &str) -> Option<&EndpointSpec> {
        self.specs
            .iter()
            .find(|s| s.method == method && s.path == path)
    }

    /// Specs in a category, in registration order
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&EndpointSpec> {
        self.specs
            .iter()
            .filter(|s| s.category == category)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointSpec> {
        self.specs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The full remote API surface.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateEndpoint`] if the table repeats an entry.
    pub fn catalog() -> Result<Self, RegistryError> {
        use Category::*;

        let specs = [
            // ── Health ──
            EndpointSpec::get("/", Health),
            // ── Optimization ──
            EndpointSpec::post("/api/optimise_metallizer", Optimization),
            EndpointSpec::post("/api/optimise_setting", Optimization),
            EndpointSpec::post("/api/optimise_wastage", Optimization),
            EndpointSpec::post("/api/optimise_hybrid", Optimization),
            EndpointSpec::get("/api/fetch_plan_data", Optimization).with_params(&[
                "algorithm",
                "company",
                "product_name",
                "product_config",
                "machine_type",
                "plant",
            ]),
            EndpointSpec::get("/api/comparison", Optimization).with_params(&[
                "company",
                "machine_type",
                "product_type",
                "product_config",
                "plant",
            ]),
            EndpointSpec::get("/api/product_results", Optimization).with_params(&[
                "company",
                "machine_type",
                "plant",
            ]),
            EndpointSpec::post("/api/update_results", Optimization),
            // ── Scheduling ──
            EndpointSpec::post("/api/changover_scheduler", Scheduling),
            EndpointSpec::post("/api/hybrid_scheduler", Scheduling),
            EndpointSpec::post("/api/otif_scheduler", Scheduling),
            EndpointSpec::get("/api/fetch_scheduler_data", Scheduling).with_params(&[
                "algorithm",
                "client_name",
                "planId",
            ]),
            // ── Planning ──
            EndpointSpec::post("/api/changover_planner", Planning),
            EndpointSpec::get("/api/changover_planner", Planning),
            EndpointSpec::get("/api/otif_planner", Planning).with_body(),
            EndpointSpec::get("/api/hybrid_planner", Planning).with_body(),
            EndpointSpec::get("/api/fetch_planner_data", Planning).with_params(&[
                "algorithm",
                "client_name",
                "planId",
                "plant",
            ]),
            // ── Campaign ──
            EndpointSpec::post("/api/save_campaign_plan", Campaign),
            EndpointSpec::get("/api/fetch_campaign_plan", Campaign).with_params(&[
                "client_name",
                "month_year",
                "primary_machine_name",
                "plant",
            ]),
            EndpointSpec::get("/api/fetch_campaign_metadata", Campaign)
                .with_params(&["client_name"]),
            EndpointSpec::get("/api/fetch_campaign_by_id", Campaign).with_params(&["campaign_id"]),
            EndpointSpec::post("/api/save_sales_forecast", Campaign),
            EndpointSpec::get("/api/fetch_sales_forecast", Campaign).with_params(&[
                "client_name",
                "month",
                "plant",
            ]),
            EndpointSpec::post("/api/validate_campaign_changes", Campaign),
            EndpointSpec::post("/api/apply_campaign_changes", Campaign),
            EndpointSpec::post("/add_version", Campaign),
            EndpointSpec::get("/get_campaign_details", Campaign)
                .with_params(&["client_name", "month"]),
            // ── User / machine ──
            EndpointSpec::post("/update_details", UserMachine),
            EndpointSpec::get("/get_details", UserMachine).with_params(&["userId"]),
            EndpointSpec::post("/add_machine", UserMachine),
            EndpointSpec::get("/get_machine_details", UserMachine)
                .with_params(&["company", "machineType"]),
            EndpointSpec::post("/upload_profile_pic", UserMachine).file_upload(),
            // ── File processing ──
            EndpointSpec::post("/api/preprocess_excel_data", FileProcessing).file_upload(),
            EndpointSpec::post("/api/save_selected_orders", FileProcessing),
            EndpointSpec::get("/api/fetch_selected_orders", FileProcessing)
                .with_params(&["client_name", "plant"]),
            EndpointSpec::post("/api/update_rolls_planned", FileProcessing),
            EndpointSpec::post("/api/save_secondary_data", FileProcessing),
            EndpointSpec::get("/api/sap_data", FileProcessing).with_params(&[
                "start_date",
                "end_date",
                "material_code",
            ]),
            // ── Misc ──
            EndpointSpec::post("/api/save_slitting_orders", Misc),
            EndpointSpec::get("/api/fetch_deckle_orders", Misc).with_params(&["company"]),
            EndpointSpec::get("/api/download_deckle_orders", Misc).with_params(&["company"]),
            EndpointSpec::get("/api/fetch_material_groups", Misc).with_params(&["company"]),
            EndpointSpec::get("/api/fetch_parameters", Misc),
            EndpointSpec::get("/api/fetch_plans_by_material_code", Misc).with_params(&[
                "material_code",
                "company",
                "machine_type",
                "plant",
            ]),
            EndpointSpec::get("/api/fetch_source_of_truth_orders", Misc)
                .with_params(&["client_name", "plant"]),
        ];

        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_every_endpoint() {
        let registry = EndpointRegistry::catalog().unwrap();
        assert_eq!(registry.len(), 46);
    }

    #[test]
    fn register_rejects_duplicate_path_and_method() {
        let mut registry = EndpointRegistry::new();
        registry
            .register(EndpointSpec::get("/api/x", Category::Misc))
            .unwrap();
        let err = registry
            .register(EndpointSpec::get("/api/x", Category::Health))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEndpoint(ref l) if l == "GET /api/x"));
    }

    #[test]
    fn same_path_different_method_is_allowed() {
        let registry = EndpointRegistry::catalog().unwrap();
        assert!(
            registry
                .get(HttpMethod::Post, "/api/changover_planner")
                .is_some()
        );
        assert!(
            registry
                .get(HttpMethod::Get, "/api/changover_planner")
                .is_some()
        );
    }

    #[test]
    fn by_category_is_stable_and_complete() {
        let registry = EndpointRegistry::catalog().unwrap();
        let scheduling: Vec<_> = registry
            .by_category(Category::Scheduling)
            .iter()
            .map(|s| s.path.as_str())
            .collect();
        assert_eq!(
            scheduling,
            vec![
                "/api/changover_scheduler",
                "/api/hybrid_scheduler",
                "/api/otif_scheduler",
                "/api/fetch_scheduler_data",
            ]
        );

        let total: usize = Category::ALL
            .iter()
            .map(|c| registry.by_category(*c).len())
            .sum();
        assert_eq!(total, registry.len());
    }

    #[test]
    fn file_uploads_are_flagged() {
        let registry = EndpointRegistry::catalog().unwrap();
        let uploads: Vec<_> = registry
            .iter()
            .filter(|s| s.is_file_upload())
            .map(|s| s.path.as_str())
            .collect();
        assert_eq!(uploads, vec!["/upload_profile_pic", "/api/preprocess_excel_data"]);
    }

    #[test]
    fn planner_gets_carry_a_body() {
        let registry = EndpointRegistry::catalog().unwrap();
        let otif = registry.get(HttpMethod::Get, "/api/otif_planner").unwrap();
        assert!(otif.requires_body);
        let changeover = registry
            .get(HttpMethod::Get, "/api/changover_planner")
            .unwrap();
        assert!(!changeover.requires_body);
    }

    #[test]
    fn category_parses_from_snake_case() {
        assert_eq!(
            "user_machine".parse::<Category>().unwrap(),
            Category::UserMachine
        );
        assert!("nope".parse::<Category>().is_err());
    }

    #[test]
    fn label_format() {
        let spec = EndpointSpec::post("/api/optimise_setting", Category::Optimization);
        assert_eq!(spec.label(), "POST /api/optimise_setting");
    }
}
