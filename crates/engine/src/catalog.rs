//! Static query catalog: one declarative descriptor per report type.
//!
//! Table expressions are opaque to the engine and passed through to the
//! query service verbatim. Descriptors are process-wide constants.

use contracts::reports::{
    AggregateOp, AggregationDef, FilterRule, Operator, ReportQueryDescriptor, ReportType,
    SearchColumn, SelectColumn,
};
use once_cell::sync::Lazy;

const fn select(key: &'static str, alias: Option<&'static str>) -> SelectColumn {
    SelectColumn { key, alias }
}

const fn agg(key: &'static str, alias: &'static str, op: AggregateOp) -> AggregationDef {
    AggregationDef { key, alias, op }
}

const fn search(
    key: &'static str,
    label: &'static str,
    table_field: Option<&'static str>,
) -> SearchColumn {
    SearchColumn {
        key,
        label,
        table_field,
    }
}

pub static VENTAS: ReportQueryDescriptor = ReportQueryDescriptor {
    table: "doctosVe venta \
            JOIN doctosVeDet renglon ON renglon.DoctoId = venta.DoctoId \
            JOIN articulos ART ON ART.ArticuloId = renglon.ArticuloId \
            JOIN clientes cliente ON cliente.ClienteId = venta.ClienteId",
    selects: &[
        select("venta.FechaEmision", Some("Fecha")),
        select("venta.Folio", None),
        select("ART.Clave", Some("Clave")),
        select("ART.Descripcion1", Some("Articulo")),
        select("cliente.Nombre", Some("Cliente")),
        select("Almacen", None),
        select("renglon.Cantidad", Some("Cantidad")),
        select("renglon.Importe", Some("Importe")),
        select("renglon.Costo", Some("Costo")),
    ],
    aggregations: &[
        agg("renglon.Importe", "totalVentas", AggregateOp::Sum),
        agg("renglon.Costo", "totalCosto", AggregateOp::Sum),
        agg("renglon.ArticuloId", "totalArticulos", AggregateOp::CountDistinct),
        agg("venta.ClienteId", "totalClientes", AggregateOp::CountDistinct),
    ],
    date_field: "venta.FechaEmision",
    warehouse_field: "Almacen",
    search_columns: &[
        search("articulo", "Artículo", Some("ART.Descripcion1")),
        search("clave", "Clave", Some("ART.Clave")),
        search("cliente", "Cliente", Some("cliente.Nombre")),
        search("folio", "Folio", Some("venta.Folio")),
    ],
};

pub static COMPRAS: ReportQueryDescriptor = ReportQueryDescriptor {
    table: "doctosCm compra \
            JOIN doctosCmDet renglon ON renglon.DoctoId = compra.DoctoId \
            JOIN articulos ART ON ART.ArticuloId = renglon.ArticuloId \
            JOIN proveedores prov ON prov.ProveedorId = compra.ProveedorId",
    selects: &[
        select("compra.FechaEmision", Some("Fecha")),
        select("compra.Folio", None),
        select("ART.Clave", Some("Clave")),
        select("ART.Descripcion1", Some("Articulo")),
        select("prov.Nombre", Some("Proveedor")),
        select("Almacen", None),
        select("renglon.Cantidad", Some("Cantidad")),
        select("renglon.Importe", Some("Importe")),
    ],
    aggregations: &[
        agg("renglon.Importe", "totalCompras", AggregateOp::Sum),
        agg("renglon.ArticuloId", "totalArticulos", AggregateOp::CountDistinct),
        agg("compra.ProveedorId", "totalProveedores", AggregateOp::CountDistinct),
    ],
    date_field: "compra.FechaEmision",
    warehouse_field: "Almacen",
    search_columns: &[
        search("articulo", "Artículo", Some("ART.Descripcion1")),
        search("clave", "Clave", Some("ART.Clave")),
        search("proveedor", "Proveedor", Some("prov.Nombre")),
        search("folio", "Folio", Some("compra.Folio")),
    ],
};

pub static MERMAS: ReportQueryDescriptor = ReportQueryDescriptor {
    table: "mermas merma \
            JOIN articulos ART ON ART.ArticuloId = merma.ArticuloId",
    selects: &[
        select("merma.Fecha", Some("Fecha")),
        select("ART.Clave", Some("Clave")),
        select("ART.Descripcion1", Some("Articulo")),
        select("Almacen", None),
        select("merma.Cantidad", Some("Cantidad")),
        select("merma.Costo", Some("Costo")),
        select("merma.Motivo", Some("Motivo")),
    ],
    aggregations: &[
        agg("merma.Costo", "totalMermas", AggregateOp::Sum),
        agg("merma.ArticuloId", "totalArticulos", AggregateOp::CountDistinct),
    ],
    date_field: "merma.Fecha",
    warehouse_field: "Almacen",
    search_columns: &[
        search("articulo", "Artículo", Some("ART.Descripcion1")),
        search("clave", "Clave", Some("ART.Clave")),
        search("motivo", "Motivo", Some("merma.Motivo")),
    ],
};

pub static INVENTARIO: ReportQueryDescriptor = ReportQueryDescriptor {
    table: "existencias inv \
            JOIN articulos ART ON ART.ArticuloId = inv.ArticuloId",
    selects: &[
        select("ART.Clave", Some("Clave")),
        select("ART.Descripcion1", Some("Articulo")),
        select("Almacen", None),
        select("inv.Existencia", Some("Existencia")),
        select("inv.CostoUnitario", Some("CostoUnitario")),
        select("inv.Diferencia", Some("Diferencia")),
    ],
    aggregations: &[
        agg("inv.ArticuloId", "totalArticulos", AggregateOp::CountDistinct),
        agg("inv.Diferencia", "diferencia", AggregateOp::Sum),
    ],
    // current stock carries no document date; date filtering does not apply
    date_field: "",
    warehouse_field: "Almacen",
    search_columns: &[
        search("articulo", "Artículo", Some("ART.Descripcion1")),
        search("clave", "Clave", Some("ART.Clave")),
        // display-only grouping label, not filterable server-side
        search("linea", "Línea", None),
    ],
};

pub static COMPARACION: ReportQueryDescriptor = ReportQueryDescriptor {
    table: "doctosVe venta \
            JOIN doctosVeDet renglon ON renglon.DoctoId = venta.DoctoId \
            JOIN articulos ART ON ART.ArticuloId = renglon.ArticuloId",
    selects: &[
        select("venta.FechaEmision", Some("Fecha")),
        select("ART.Clave", Some("Clave")),
        select("ART.Descripcion1", Some("Articulo")),
        select("venta.Almacen", Some("AlmacenVenta")),
        select("renglon.Importe", Some("Importe")),
        select("renglon.Costo", Some("Costo")),
    ],
    aggregations: &[
        agg("renglon.Importe", "totalVentas", AggregateOp::Sum),
        agg("renglon.Costo", "totalCosto", AggregateOp::Sum),
    ],
    date_field: "venta.FechaEmision",
    warehouse_field: "venta.Almacen",
    search_columns: &[
        search("articulo", "Artículo", Some("ART.Descripcion1")),
        search("clave", "Clave", Some("ART.Clave")),
    ],
};

/// Descriptor for a report type
pub fn descriptor(report_type: ReportType) -> &'static ReportQueryDescriptor {
    match report_type {
        ReportType::Ventas => &VENTAS,
        ReportType::Compras => &COMPRAS,
        ReportType::Mermas => &MERMAS,
        ReportType::Inventario => &INVENTARIO,
        ReportType::Comparacion => &COMPARACION,
    }
}

/// Searchable columns for a report type
pub fn search_columns(report_type: ReportType) -> &'static [SearchColumn] {
    descriptor(report_type).search_columns
}

// Quick mode always constrains sales to concluded documents of the
// movement types that count as revenue.
static VENTAS_MANDATORY: Lazy<Vec<FilterRule>> = Lazy::new(|| {
    vec![
        FilterRule::new("venta.Estatus", Operator::Eq, "CONCLUIDO"),
        FilterRule::new("venta.Mov", Operator::In, "Factura,Factura Credito,Nota"),
    ]
});

static COMPRAS_MANDATORY: Lazy<Vec<FilterRule>> =
    Lazy::new(|| vec![FilterRule::new("compra.Estatus", Operator::Eq, "CONCLUIDO")]);

static MERMAS_MANDATORY: Lazy<Vec<FilterRule>> =
    Lazy::new(|| vec![FilterRule::new("merma.Tipo", Operator::Eq, "Salida")]);

/// Report-mandatory business rules, appended unconditionally in quick
/// mode. Advanced mode does not inject these; the user is expected to
/// express them explicitly.
pub fn mandatory_filters(report_type: ReportType) -> Vec<FilterRule> {
    match report_type {
        ReportType::Ventas | ReportType::Comparacion => VENTAS_MANDATORY.clone(),
        ReportType::Compras => COMPRAS_MANDATORY.clone(),
        ReportType::Mermas => MERMAS_MANDATORY.clone(),
        ReportType::Inventario => Vec::new(),
    }
}

/// Re-select a search column after the report type changed.
///
/// Best effort: a column with the same key that can filter server-side is
/// kept; otherwise fall back to the `articulo` column, then to the first
/// column of the new report.
pub fn resolve_search_column(
    report_type: ReportType,
    previous_key: &str,
) -> &'static SearchColumn {
    let desc = descriptor(report_type);
    if let Some(column) = desc.search_column(previous_key) {
        if column.can_filter() {
            return column;
        }
    }
    desc.search_column("articulo")
        .unwrap_or_else(|| desc.default_search_column())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_aggregation_aliases_unique_per_descriptor() {
        for report_type in ReportType::all() {
            let desc = descriptor(*report_type);
            let aliases: HashSet<_> = desc.aggregations.iter().map(|a| a.alias).collect();
            assert_eq!(
                aliases.len(),
                desc.aggregations.len(),
                "duplicate aggregation alias in {report_type}"
            );
        }
    }

    #[test]
    fn test_every_descriptor_has_search_columns() {
        for report_type in ReportType::all() {
            assert!(!descriptor(*report_type).search_columns.is_empty());
        }
    }

    #[test]
    fn test_inventario_has_no_date_field() {
        assert!(descriptor(ReportType::Inventario).date_field.is_empty());
        assert!(!descriptor(ReportType::Ventas).date_field.is_empty());
    }

    #[test]
    fn test_comparacion_warehouse_field_is_qualified() {
        assert_eq!(descriptor(ReportType::Comparacion).warehouse_field, "venta.Almacen");
        assert_eq!(descriptor(ReportType::Ventas).warehouse_field, "Almacen");
    }

    #[test]
    fn test_mandatory_rules() {
        let ventas = mandatory_filters(ReportType::Ventas);
        assert_eq!(ventas.len(), 2);
        assert_eq!(ventas[0].key, "venta.Estatus");
        assert_eq!(ventas[0].value.as_deref(), Some("CONCLUIDO"));
        assert_eq!(mandatory_filters(ReportType::Comparacion), ventas);
        assert!(mandatory_filters(ReportType::Inventario).is_empty());
    }

    #[test]
    fn test_search_column_portability() {
        // same key with a table field survives the change
        let column = resolve_search_column(ReportType::Compras, "clave");
        assert_eq!(column.key, "clave");

        // missing key falls back to "articulo"
        let column = resolve_search_column(ReportType::Mermas, "cliente");
        assert_eq!(column.key, "articulo");

        // display-only columns are not portable targets
        let column = resolve_search_column(ReportType::Inventario, "linea");
        assert_eq!(column.key, "articulo");
    }
}
