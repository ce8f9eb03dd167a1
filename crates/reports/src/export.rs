//! Tabular renderings of a movement report.
//!
//! Pure presentation: rows in, text out. The CSV output opens directly in
//! spreadsheet tools; the HTML output is a self-contained printable page.

use chrono::{DateTime, Utc};

use crate::model::MovementRow;

/// Render a movement report as CSV with a fixed header row.
pub fn movements_to_csv(rows: &[MovementRow]) -> String {
    let mut out = String::from("date,product,manufacturer,kind,quantity,notes\n");

    for row in rows {
        out.push_str(&csv_field(&row.occurred_at.to_rfc3339()));
        out.push(',');
        out.push_str(&csv_field(&row.product_name));
        out.push(',');
        out.push_str(&csv_field(row.manufacturer_label()));
        out.push(',');
        out.push_str(row.kind.as_str());
        out.push(',');
        out.push_str(&row.quantity.to_string());
        out.push(',');
        out.push_str(&csv_field(row.notes.as_deref().unwrap_or("")));
        out.push('\n');
    }

    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a movement report as a printable HTML page.
///
/// Entry rows are tinted green and exit rows red, matching the on-screen
/// report.
pub fn movements_to_html(rows: &[MovementRow], generated_at: DateTime<Utc>) -> String {
    let mut out = String::with_capacity(1024 + rows.len() * 160);

    out.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Stock movement report</title>\n<style>\n\
         body { font-family: Arial, sans-serif; margin: 20px; }\n\
         h1 { text-align: center; margin-bottom: 20px; }\n\
         table { width: 100%; border-collapse: collapse; }\n\
         th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
         th { background-color: #f2f2f2; }\n\
         .entry { color: green; }\n\
         .exit { color: red; }\n\
         </style>\n</head>\n<body>\n<h1>Stock movement report</h1>\n",
    );
    out.push_str(&format!(
        "<p>Generated: {}</p>\n",
        html_escape(&generated_at.to_rfc3339())
    ));
    out.push_str(
        "<table>\n<thead><tr>\
         <th>Date</th><th>Product</th><th>Manufacturer</th>\
         <th>Kind</th><th>Quantity</th><th>Notes</th>\
         </tr></thead>\n<tbody>\n",
    );

    for row in rows {
        out.push_str(&format!(
            "<tr class=\"{kind}\"><td>{date}</td><td>{product}</td><td>{manufacturer}</td>\
             <td>{kind}</td><td>{quantity}</td><td>{notes}</td></tr>\n",
            kind = row.kind.as_str(),
            date = html_escape(&row.occurred_at.to_rfc3339()),
            product = html_escape(&row.product_name),
            manufacturer = html_escape(row.manufacturer_label()),
            quantity = row.quantity,
            notes = html_escape(row.notes.as_deref().unwrap_or("")),
        ));
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNKNOWN_MANUFACTURER;
    use chrono::TimeZone;
    use depot_core::{MovementId, ProductId};
    use depot_ledger::MovementKind;

    fn row(notes: Option<&str>) -> MovementRow {
        MovementRow {
            id: MovementId::new(),
            product_id: ProductId::new(),
            product_name: "Laptop, 15\"".to_string(),
            manufacturer_id: None,
            manufacturer_name: Some("Acme".to_string()),
            kind: MovementKind::Exit,
            quantity: 3,
            occurred_at: Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap(),
            notes: notes.map(String::from),
        }
    }

    #[test]
    fn csv_has_header_and_quotes_awkward_fields() {
        let csv = movements_to_csv(&[row(Some("rush order"))]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,product,manufacturer,kind,quantity,notes"
        );
        let data = lines.next().unwrap();
        // Name contains a comma and a quote: must be quoted with the quote doubled.
        assert!(data.contains("\"Laptop, 15\"\"\""));
        assert!(data.contains(",exit,3,rush order"));
    }

    #[test]
    fn missing_names_render_placeholders() {
        let mut r = row(None);
        r.manufacturer_name = None;
        let csv = movements_to_csv(&[r]);
        assert!(csv.contains(UNKNOWN_MANUFACTURER));
    }

    #[test]
    fn html_escapes_markup_and_classes_rows_by_kind() {
        let mut r = row(Some("<script>"));
        r.product_name = "A & B".to_string();
        let html = movements_to_html(&[r], Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("class=\"exit\""));
        assert!(!html.contains("<script>"));
    }
}
