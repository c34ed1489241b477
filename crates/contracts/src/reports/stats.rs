use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Wire/field aliases of the aggregate metrics
pub mod fields {
    pub const TOTAL_VENTAS: &str = "totalVentas";
    pub const TOTAL_COSTO: &str = "totalCosto";
    pub const TOTAL_ARTICULOS: &str = "totalArticulos";
    pub const TOTAL_CLIENTES: &str = "totalClientes";
    pub const TOTAL_PROVEEDORES: &str = "totalProveedores";
    pub const TOTAL_MERMAS: &str = "totalMermas";
    pub const TOTAL_COMPRAS: &str = "totalCompras";
    pub const DIFERENCIA: &str = "diferencia";
    pub const UTILIDAD: &str = "utilidad";
    pub const MARGEN: &str = "margen";

    /// Fields populated from aggregate rows (everything except the
    /// derived utilidad/margen)
    pub const SOURCE: &[&str] = &[
        TOTAL_VENTAS,
        TOTAL_COSTO,
        TOTAL_ARTICULOS,
        TOTAL_CLIENTES,
        TOTAL_PROVEEDORES,
        TOTAL_MERMAS,
        TOTAL_COMPRAS,
        DIFERENCIA,
    ];
}

/// Round to 2 decimals, half away from zero, on the decimal value of the
/// float. Plain `(x * 100.0).round() / 100.0` operates on the binary
/// representation and misrounds midpoints such as 100.005.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Normalized aggregate summary for one report or a consolidated view.
///
/// Every field is optional: absence means the metric was not produced by
/// any aggregate row, which is distinct from a computed zero. Instances
/// are built fresh per fetch/merge cycle and replace the previous value
/// wholesale, never mutated in place by concurrent operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_ventas: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_costo: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_articulos: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_clientes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_proveedores: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_mermas: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_compras: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub diferencia: Option<f64>,
    /// Derived: ventas minus costo (or compras), see `with_derived`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub utilidad: Option<f64>,
    /// Derived: utilidad over ventas, as a percentage
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub margen: Option<f64>,
}

impl StatsData {
    /// Read a metric by its wire alias. Unknown aliases read as absent.
    pub fn get(&self, field: &str) -> Option<f64> {
        match field {
            fields::TOTAL_VENTAS => self.total_ventas,
            fields::TOTAL_COSTO => self.total_costo,
            fields::TOTAL_ARTICULOS => self.total_articulos,
            fields::TOTAL_CLIENTES => self.total_clientes,
            fields::TOTAL_PROVEEDORES => self.total_proveedores,
            fields::TOTAL_MERMAS => self.total_mermas,
            fields::TOTAL_COMPRAS => self.total_compras,
            fields::DIFERENCIA => self.diferencia,
            fields::UTILIDAD => self.utilidad,
            fields::MARGEN => self.margen,
            _ => None,
        }
    }

    /// Write a metric by its wire alias. Unknown aliases are ignored.
    pub fn set(&mut self, field: &str, value: Option<f64>) {
        let slot = match field {
            fields::TOTAL_VENTAS => &mut self.total_ventas,
            fields::TOTAL_COSTO => &mut self.total_costo,
            fields::TOTAL_ARTICULOS => &mut self.total_articulos,
            fields::TOTAL_CLIENTES => &mut self.total_clientes,
            fields::TOTAL_PROVEEDORES => &mut self.total_proveedores,
            fields::TOTAL_MERMAS => &mut self.total_mermas,
            fields::TOTAL_COMPRAS => &mut self.total_compras,
            fields::DIFERENCIA => &mut self.diferencia,
            fields::UTILIDAD => &mut self.utilidad,
            fields::MARGEN => &mut self.margen,
            _ => return,
        };
        *slot = value;
    }

    /// Null-safe accumulation: an absent target starts from 0, an absent
    /// contribution is never coerced into one.
    pub fn add(&mut self, field: &str, value: f64) {
        let current = self.get(field).unwrap_or(0.0);
        self.set(field, Some(current + value));
    }

    /// No metric present at all
    pub fn is_empty(&self) -> bool {
        fields::SOURCE.iter().all(|f| self.get(f).is_none())
            && self.utilidad.is_none()
            && self.margen.is_none()
    }

    /// Recompute the derived metrics from the source totals.
    ///
    /// `utilidad = round2(totalVentas - totalCosto)`, falling back to
    /// `totalCompras` as the cost basis when no costo was aggregated
    /// (the comparison against a purchases aggregate). `margen` is the
    /// utilidad share of ventas in percent, defined only when
    /// `totalVentas > 0` so it can never be NaN or infinite.
    pub fn with_derived(mut self) -> Self {
        self.utilidad = None;
        self.margen = None;

        let cost_basis = self.total_costo.or(self.total_compras);
        if let (Some(ventas), Some(costo)) = (self.total_ventas, cost_basis) {
            let utilidad = round2(ventas - costo);
            self.utilidad = Some(utilidad);
            if ventas > 0.0 {
                self.margen = Some(round2(utilidad / ventas * 100.0));
            }
        }
        self
    }
}
