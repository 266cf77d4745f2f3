//! Known backend-environment limitations
//!
//! A marker turns a would-be failure into a skip. Markers are matched before
//! any pass/fail judgement, and only the classifier reads them. When the
//! backend rewords one of these messages, edit the table and bump
//! [`SKIP_MARKERS_VERSION`].

use serde::Serialize;

/// Revision of the marker table, recorded in every report
pub const SKIP_MARKERS_VERSION: u32 = 3;

/// Body substring (optionally status-guarded) that identifies an environment problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkipMarker {
    pub id: &'static str,
    /// Case-sensitive; empty matches any body
    pub substring: &'static str,
    /// Statuses the marker applies to; empty matches any status
    pub statuses: &'static [u16],
    pub reason: &'static str,
}

impl SkipMarker {
    #[must_use]
    pub fn matches(&self, status: u16, body: &str) -> bool {
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&status);
        status_ok && body.contains(self.substring)
    }

    /// Marker with neither guard would swallow every response
    #[must_use]
    pub fn is_unguarded(&self) -> bool {
        self.substring.is_empty() && self.statuses.is_empty()
    }
}

/// First marker in `markers` that matches the response
#[must_use]
pub fn find_match<'a>(markers: &'a [SkipMarker], status: u16, body: &str) -> Option<&'a SkipMarker> {
    markers.iter().find(|m| m.matches(status, body))
}

pub const SOLVER_LICENSE: SkipMarker = SkipMarker {
    id: "solver_license",
    substring: "Single-use license",
    statuses: &[500],
    reason: "Solver license currently in use",
};

pub const MISSING_CAMPAIGN_DATA: SkipMarker = SkipMarker {
    id: "missing_campaign_data",
    substring: "not enough values to unpack",
    statuses: &[500],
    reason: "Scheduler backend lacks campaign data",
};

pub const SALES_FORECAST_MISSING: SkipMarker = SkipMarker {
    id: "sales_forecast_missing",
    substring: "Sales forecast not found",
    statuses: &[404],
    reason: "Sales forecast not available in backend",
};

pub const SOURCE_OF_TRUTH_MISSING: SkipMarker = SkipMarker {
    id: "source_of_truth_missing",
    substring: "No source of truth orders",
    statuses: &[404],
    reason: "Source of truth orders missing in backend",
};

pub const PLANNER_DATA_MISSING: SkipMarker = SkipMarker {
    id: "planner_data_missing",
    substring: "No matching data",
    statuses: &[404],
    reason: "No planner data stored for the plan id",
};

pub const AWS_CREDENTIALS: SkipMarker = SkipMarker {
    id: "aws_credentials",
    substring: "AWS credentials",
    statuses: &[500],
    reason: "AWS credentials not configured in backend",
};

pub const USER_NOT_FOUND: SkipMarker = SkipMarker {
    id: "user_not_found",
    substring: "User not found",
    statuses: &[404],
    reason: "User record not persisted in backend",
};

pub const MACHINE_CONFIG_MISSING: SkipMarker = SkipMarker {
    id: "machine_config_missing",
    substring: "error",
    statuses: &[400, 404],
    reason: "Machine configuration not present in backend",
};

pub const MATERIAL_GROUPS_MISSING: SkipMarker = SkipMarker {
    id: "material_groups_missing",
    substring: "No material groups",
    statuses: &[404],
    reason: "Material groups not present in backend storage",
};

pub const PARAMETERS_BUCKET: SkipMarker = SkipMarker {
    id: "parameters_bucket",
    substring: "NoSuchBucket",
    statuses: &[500],
    reason: "Parameters bucket not configured in backend",
};

pub const PARAMETERS_ABSENT: SkipMarker = SkipMarker {
    id: "parameters_absent",
    substring: "",
    statuses: &[404],
    reason: "Parameters file not configured in backend",
};

pub const PRODUCTION_DATA_MISSING: SkipMarker = SkipMarker {
    id: "production_data_missing",
    substring: "",
    statuses: &[500],
    reason: "Primary optimisation needs backend production data",
};

pub const OPTIMISER_SETUP_MISSING: SkipMarker = SkipMarker {
    id: "optimiser_setup_missing",
    substring: "",
    statuses: &[500],
    reason: "Secondary data save needs backend optimiser setup",
};

/// Every marker, for listing and validation
pub const ALL: [SkipMarker; 13] = [
    SOLVER_LICENSE,
    MISSING_CAMPAIGN_DATA,
    SALES_FORECAST_MISSING,
    SOURCE_OF_TRUTH_MISSING,
    PLANNER_DATA_MISSING,
    AWS_CREDENTIALS,
    USER_NOT_FOUND,
    MACHINE_CONFIG_MISSING,
    MATERIAL_GROUPS_MISSING,
    PARAMETERS_BUCKET,
    PARAMETERS_ABSENT,
    PRODUCTION_DATA_MISSING,
    OPTIMISER_SETUP_MISSING,
];
