//! Order-book rows used by the optimization fixtures

use serde::{Serialize, Serializer};

/// Production priority of an order row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderOption {
    MustMake,
    Optional,
}

/// One line of the order book as exported from the ERP sheet.
///
/// Wire keys are the sheet's column headers, typos and padding included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRow {
    #[serde(rename = "Item No.")]
    pub item_no: u32,
    #[serde(rename = "Sales Orde")]
    pub sales_order: u64,
    /// Unreleased orders have no production order yet; sent as `""`
    #[serde(rename = "Prod.Ord", serialize_with = "blank_if_none")]
    pub prod_order: Option<u64>,
    #[serde(rename = "SO Crtd Dt")]
    pub created_serial: u32,
    #[serde(rename = "Buyer Name")]
    pub buyer: String,
    #[serde(rename = "Consignee Name")]
    pub consignee: String,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Micron")]
    pub micron: u32,
    #[serde(rename = "Width")]
    pub width: u32,
    #[serde(rename = "ID")]
    pub inner_diameter: u32,
    #[serde(rename = "OD")]
    pub outer_diameter: u32,
    #[serde(rename = "Lenght")]
    pub length: f64,
    #[serde(rename = "CT Side")]
    pub ct_side: String,
    #[serde(rename = "Pend. Prod")]
    pub pending_production: f64,
    #[serde(rename = "Rolls")]
    pub rolls: u32,
    #[serde(rename = "    SO.Qty")]
    pub ordered_qty: f64,
    #[serde(rename = " Stock")]
    pub stock: f64,
    #[serde(rename = "Pend. Disp")]
    pub pending_dispatch: f64,
    #[serde(rename = "Disp.Qty")]
    pub dispatched_qty: f64,
    #[serde(rename = "Grade")]
    pub grade: String,
    #[serde(rename = "Prod. Qty.")]
    pub produced_qty: f64,
    #[serde(rename = "Order Remarks")]
    pub remarks: String,
    #[serde(rename = "Option")]
    pub option: OrderOption,
}

fn blank_if_none<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_u64(*v),
        None => serializer.serialize_str(""),
    }
}

/// The per-order columns that vary; the rest are fixed for the CB18HI-MD film.
struct RowSeed {
    item_no: u32,
    sales_order: u64,
    prod_order: Option<u64>,
    created_serial: u32,
    customer: &'static str,
    width: u32,
    pending_production: f64,
    rolls: u32,
    ordered_qty: f64,
    pending_dispatch: f64,
    dispatched_qty: f64,
    produced_qty: f64,
    remarks: &'static str,
    option: OrderOption,
}

impl From<&RowSeed> for OrderRow {
    fn from(seed: &RowSeed) -> Self {
        Self {
            item_no: seed.item_no,
            sales_order: seed.sales_order,
            prod_order: seed.prod_order,
            created_serial: seed.created_serial,
            buyer: seed.customer.to_string(),
            consignee: seed.customer.to_string(),
            material: "CB18HI-MD".to_string(),
            micron: 18,
            width: seed.width,
            inner_diameter: 152,
            outer_diameter: 650,
            length: 16672.44,
            ct_side: "IN".to_string(),
            pending_production: seed.pending_production,
            rolls: seed.rolls,
            ordered_qty: seed.ordered_qty,
            stock: 0.0,
            pending_dispatch: seed.pending_dispatch,
            dispatched_qty: seed.dispatched_qty,
            grade: "A".to_string(),
            produced_qty: seed.produced_qty,
            remarks: seed.remarks.to_string(),
            option: seed.option,
        }
    }
}

const SPINCO: RowSeed = RowSeed {
    item_no: 20,
    sales_order: 170_166,
    prod_order: Some(510_087_252),
    created_serial: 45805,
    customer: "SPINCO INDIA LIMITED",
    width: 610,
    pending_production: 1839.46,
    rolls: 12,
    ordered_qty: 2000.0,
    pending_dispatch: 1839.46,
    dispatched_qty: 160.54,
    produced_qty: 160.54,
    remarks: "-",
    option: OrderOption::Optional,
};

const PRIMARY: [RowSeed; 5] = [
    RowSeed {
        item_no: 20,
        sales_order: 170_067,
        prod_order: Some(510_087_241),
        created_serial: 45803,
        customer: "OSWAL EXTRUSION LIMITED",
        width: 1010,
        pending_production: 7500.0,
        rolls: 26,
        ordered_qty: 7500.0,
        pending_dispatch: 7500.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: "NEED ARROW DIRECTION MARK INDICATING OPENING DIRECTION OF ROLLS",
        option: OrderOption::MustMake,
    },
    RowSeed {
        item_no: 10,
        sales_order: 170_129,
        prod_order: Some(510_087_245),
        created_serial: 45804,
        customer: "A.B. POLYPACKS PVT LTD",
        width: 1260,
        pending_production: 12000.0,
        rolls: 33,
        ordered_qty: 12000.0,
        pending_dispatch: 12000.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: ".",
        option: OrderOption::MustMake,
    },
    RowSeed {
        item_no: 10,
        sales_order: 170_139,
        prod_order: Some(510_087_247),
        created_serial: 45804,
        customer: "Shrinath Rotopack Pvt. Ltd Unit-III",
        width: 1023,
        pending_production: 500.0,
        rolls: 2,
        ordered_qty: 500.0,
        pending_dispatch: 500.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: ".",
        option: OrderOption::Optional,
    },
    SPINCO,
    RowSeed {
        item_no: 10,
        sales_order: 170_282,
        prod_order: Some(510_087_281),
        created_serial: 45808,
        customer: "A.M.P.POLYMERS INDIA PVT LTD",
        width: 735,
        pending_production: 1500.0,
        rolls: 6,
        ordered_qty: 1500.0,
        pending_dispatch: 1500.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: "-",
        option: OrderOption::Optional,
    },
];

const SECONDARY: [RowSeed; 3] = [
    SPINCO,
    RowSeed {
        item_no: 10,
        sales_order: 170_297,
        prod_order: None,
        created_serial: 45808,
        customer: "SUNPACK INDUSTRIES",
        width: 952,
        pending_production: 3100.0,
        rolls: 11,
        ordered_qty: 3100.0,
        pending_dispatch: 3100.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: ".",
        option: OrderOption::Optional,
    },
    RowSeed {
        item_no: 60,
        sales_order: 170_282,
        prod_order: Some(510_087_286),
        created_serial: 45808,
        customer: "A.M.P.POLYMERS INDIA PVT LTD",
        width: 915,
        pending_production: 2000.0,
        rolls: 9,
        ordered_qty: 2000.0,
        pending_dispatch: 2000.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: "-",
        option: OrderOption::Optional,
    },
];

const METALLIZER: [RowSeed; 3] = [
    RowSeed {
        item_no: 40,
        sales_order: 170_282,
        prod_order: Some(510_087_284),
        created_serial: 45808,
        customer: "A.M.P.POLYMERS INDIA PVT LTD",
        width: 655,
        pending_production: 1500.0,
        rolls: 6,
        ordered_qty: 1500.0,
        pending_dispatch: 1500.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: "-",
        option: OrderOption::Optional,
    },
    RowSeed {
        item_no: 10,
        sales_order: 170_366,
        prod_order: None,
        created_serial: 45812,
        customer: "P.M. TRADING CO.",
        width: 815,
        pending_production: 8500.0,
        rolls: 28,
        ordered_qty: 8500.0,
        pending_dispatch: 8500.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: ".",
        option: OrderOption::Optional,
    },
    RowSeed {
        item_no: 20,
        sales_order: 170_228,
        prod_order: Some(510_087_204),
        created_serial: 45806,
        customer: "HIND POLY TRADERS PVT. LTD",
        width: 750,
        pending_production: 1000.0,
        rolls: 6,
        ordered_qty: 1000.0,
        pending_dispatch: 1000.0,
        dispatched_qty: 0.0,
        produced_qty: 0.0,
        remarks: "-",
        option: OrderOption::Optional,
    },
];

#[must_use]
pub fn primary_rows() -> Vec<OrderRow> {
    PRIMARY.iter().map(OrderRow::from).collect()
}

#[must_use]
pub fn secondary_rows() -> Vec<OrderRow> {
    SECONDARY.iter().map(OrderRow::from).collect()
}

#[must_use]
pub fn metallizer_rows() -> Vec<OrderRow> {
    METALLIZER.iter().map(OrderRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_production_order_serializes_as_empty_string() {
        let rows = secondary_rows();
        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["Prod.Ord"], serde_json::json!(""));
        assert_eq!(json["Sales Orde"], serde_json::json!(170_297));
    }

    #[test]
    fn sheet_headers_keep_their_padding() {
        let json = serde_json::to_value(&primary_rows()[0]).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("    SO.Qty"));
        assert!(obj.contains_key(" Stock"));
        assert!(obj.contains_key("Lenght"));
        assert_eq!(obj["Option"], serde_json::json!("MustMake"));
    }

    #[test]
    fn buyer_and_consignee_match() {
        for row in primary_rows()
            .iter()
            .chain(secondary_rows().iter())
            .chain(metallizer_rows().iter())
        {
            assert_eq!(row.buyer, row.consignee);
        }
    }

    #[test]
    fn row_counts() {
        assert_eq!(primary_rows().len(), 5);
        assert_eq!(secondary_rows().len(), 3);
        assert_eq!(metallizer_rows().len(), 3);
    }
}
