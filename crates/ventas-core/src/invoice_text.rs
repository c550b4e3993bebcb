//! # Invoice Text
//!
//! Renders a human-readable invoice from a sale's current data.
//!
//! ## Layout
//! ```text
//! Factura para la Venta ID: 6f1c...
//! Fecha: 2024-03-15T10:30:00
//! Cliente: Juan Perez (RUT: 12345678-9)
//! Medio de Envío: DESPACHO_A_DOMICILIO
//! Estado: PENDIENTE
//! --- Detalles ---
//! 2 x Producto A @ 10.00 = 20.00
//! 1 x Producto B @ 20.00 = 20.00
//! -------------------
//! Monto Total: 40.00
//! ```
//!
//! The text is independent of any persisted `Invoice`: it prints the sale's
//! stored total (which may already carry compounded discounts), never a
//! re-derivation from line items. Amounts go through `Money`'s `Display`, so
//! the output does not depend on locale.
//!
//! The `Fecha:` line always carries seconds, even when they are zero
//! (`2024-03-15T10:30:00`, never `2024-03-15T10:30`), and never fractions.

use std::fmt::{self, Write};

use crate::types::{Customer, Sale};

/// Format used for the `Fecha:` line. Seconds are always printed.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const CUSTOMER_UNASSIGNED: &str = "Sin asignar";
const NO_PRODUCTS: &str = "No hay productos en esta venta.";
const DETAILS_HEADER: &str = "--- Detalles ---";
const DETAILS_FOOTER: &str = "-------------------";
const SUBTOTAL_OVERFLOW: &str = "(fuera de rango)";

/// Renders the invoice text for `sale`.
///
/// `customer` is `None` when the sale's customer does not resolve; the
/// output then carries an explicit unassigned marker.
pub fn render(sale: &Sale, customer: Option<&Customer>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_invoice(&mut out, sale, customer);
    out
}

/// Writes the invoice text for `sale` into any `fmt::Write` sink.
pub fn write_invoice<W: Write>(
    out: &mut W,
    sale: &Sale,
    customer: Option<&Customer>,
) -> fmt::Result {
    writeln!(out, "Factura para la Venta ID: {}", sale.id)?;
    writeln!(out, "Fecha: {}", sale.sold_at.format(DATE_FORMAT))?;
    match customer {
        Some(c) => writeln!(out, "Cliente: {} (RUT: {})", c.full_name, c.rut)?,
        None => writeln!(out, "Cliente: {}", CUSTOMER_UNASSIGNED)?,
    }
    writeln!(out, "Medio de Envío: {}", sale.shipping_method.invoice_label())?;
    writeln!(out, "Estado: {}", sale.status.invoice_label())?;
    writeln!(out, "{}", DETAILS_HEADER)?;

    if sale.line_items.is_empty() {
        writeln!(out, "{}", NO_PRODUCTS)?;
    }
    for item in &sale.line_items {
        write!(
            out,
            "{} x {} @ {} = ",
            item.quantity,
            item.name_snapshot,
            item.unit_price()
        )?;
        match item.subtotal() {
            Some(subtotal) => writeln!(out, "{}", subtotal)?,
            None => writeln!(out, "{}", SUBTOTAL_OVERFLOW)?,
        }
    }

    writeln!(out, "{}", DETAILS_FOOTER)?;
    writeln!(out, "Monto Total: {}", sale.total())
}
