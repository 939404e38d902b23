//! Remito (delivery note) rendering.
//!
//! One A4 page layout with the store header on the left, the document number
//! on the right, the client box, the item table and the total. Long item
//! lists continue on extra pages.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use thiserror::Error;

use crate::domain::client::ClientSnapshot;
use crate::domain::line_item::LineItem;
use crate::domain::project::Project;
use crate::domain::sale::Sale;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 195.0;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("pdf generation failed: {0}")]
    Render(String),
}

/// Everything a remito needs, independent of the source document.
pub struct RemitoData {
    /// Heading, e.g. `REMITO - VENTA N° 12`.
    pub title: String,
    pub date: String,
    pub client: ClientSnapshot,
    /// Employee who prepared the goods, printed at the bottom.
    pub employee: Option<String>,
    pub items: Vec<LineItem>,
    pub total: i64,
}

impl RemitoData {
    pub fn from_sale(sale: &Sale, employee: Option<String>) -> Self {
        Self {
            title: format!("REMITO - VENTA N° {}", sale.id),
            date: sale.sale_date.format("%d/%m/%Y").to_string(),
            client: sale.client.clone(),
            employee,
            items: sale.items.clone(),
            total: sale.total,
        }
    }

    pub fn from_project(project: &Project, employee: Option<String>) -> Self {
        Self {
            title: format!("REMITO - OBRA N° {}", project.id),
            date: project.start_date.format("%d/%m/%Y").to_string(),
            client: project.client.clone(),
            employee,
            items: project.items.clone(),
            total: project.total,
        }
    }
}

/// Format an amount in pesos with dot thousand separators: `$ 12.500`.
pub fn format_money(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("$ -{grouped}")
    } else {
        format!("$ {grouped}")
    }
}

fn push_line(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, font_size, Mm(x), Mm(y), font);
}

fn divider(layer: &PdfLayerReference, y: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (printpdf::Point::new(Mm(MARGIN_LEFT), Mm(y)), false),
            (printpdf::Point::new(Mm(MARGIN_RIGHT), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Render the remito into PDF bytes.
pub fn render_remito(data: &RemitoData) -> Result<Vec<u8>, PdfError> {
    let (doc, page1, layer1) = PdfDocument::new(
        data.title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let mut layer = doc.get_page(page1).get_layer(layer1);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Render(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Render(e.to_string()))?;

    let mut y: f32 = 285.0;

    // Store header (left), document title (right)
    push_line(&layer, &font_bold, "Maderera San Martín", 16.0, MARGIN_LEFT, y);
    push_line(&layer, &font_bold, &data.title, 13.0, 120.0, y);
    y -= 6.0;
    push_line(
        &layer,
        &font,
        "Av. San Martín 2450 - Tel. 11 4765-0199",
        9.0,
        MARGIN_LEFT,
        y,
    );
    push_line(&layer, &font, &format!("Fecha: {}", data.date), 10.0, 120.0, y);

    y -= 6.0;
    divider(&layer, y);

    // Client box
    y -= 8.0;
    push_line(&layer, &font_bold, "Cliente:", 11.0, MARGIN_LEFT, y);
    push_line(&layer, &font, &data.client.name, 11.0, 40.0, y);
    if let Some(tax_id) = &data.client.tax_id {
        y -= 5.0;
        push_line(&layer, &font, &format!("CUIT: {tax_id}"), 9.0, 40.0, y);
    }
    if let Some(address) = &data.client.address {
        y -= 5.0;
        push_line(&layer, &font, address, 9.0, 40.0, y);
    }

    // Item table header
    y -= 10.0;
    let x_name = MARGIN_LEFT;
    let x_qty = 120.0;
    let x_unit = 145.0;
    let x_total = 172.0;

    push_line(&layer, &font_bold, "Detalle", 10.0, x_name, y);
    push_line(&layer, &font_bold, "Cant.", 10.0, x_qty, y);
    push_line(&layer, &font_bold, "Precio", 10.0, x_unit, y);
    push_line(&layer, &font_bold, "Importe", 10.0, x_total, y);
    y -= 2.5;
    divider(&layer, y);
    y -= 6.0;

    for (index, item) in data.items.iter().enumerate() {
        if y < 30.0 {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = 285.0;
        }

        let mut name = format!("{}. {}", index + 1, item.name);
        if let Some(cut) = &item.cut {
            name.push_str(&format!(
                " ({}\" x {}\" x {} m{})",
                cut.height,
                cut.width,
                cut.length,
                if cut.planed { ", cepillado" } else { "" }
            ));
        }

        push_line(&layer, &font, &name, 9.0, x_name, y);
        push_line(&layer, &font, &format!("{}", item.quantity), 9.0, x_qty, y);
        push_line(&layer, &font, &format_money(item.unit_price), 9.0, x_unit, y);
        push_line(&layer, &font, &format_money(item.subtotal), 9.0, x_total, y);

        y -= 5.5;
    }

    y -= 2.0;
    divider(&layer, y);

    // Total
    y -= 8.0;
    push_line(&layer, &font_bold, "TOTAL:", 12.0, x_unit, y);
    push_line(&layer, &font_bold, &format_money(data.total), 12.0, x_total, y);

    // Footer
    if let Some(employee) = &data.employee {
        push_line(
            &layer,
            &font,
            &format!("Preparó: {employee}"),
            9.0,
            MARGIN_LEFT,
            15.0,
        );
    }
    push_line(
        &layer,
        &font,
        "Documento no válido como factura.",
        8.0,
        120.0,
        15.0,
    );

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| PdfError::Render(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| PdfError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::line_item::CutDetail;
    use crate::domain::product::ProductCategory;
    use crate::domain::sale::{DeliveryType, SaleStatus};

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(0), "$ 0");
        assert_eq!(format_money(900), "$ 900");
        assert_eq!(format_money(12500), "$ 12.500");
        assert_eq!(format_money(1234567), "$ 1.234.567");
        assert_eq!(format_money(-4500), "$ -4.500");
    }

    fn sample_sale() -> Sale {
        Sale {
            id: 12,
            client_id: None,
            client: ClientSnapshot {
                name: "García Hnos.".to_string(),
                tax_id: Some("30-11223344-5".to_string()),
                phone: None,
                address: Some("Calle 12 n° 340".to_string()),
            },
            sale_date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap_or_default(),
            salesperson: Some("Raúl".to_string()),
            delivery_type: DeliveryType::HomeDelivery,
            shipping_cost: 2000,
            discount_total: 0,
            subtotal: 7000,
            total: 9000,
            status: SaleStatus::Pending,
            notes: None,
            items: vec![LineItem {
                product_id: Some(7),
                name: "Tirante 2x3".to_string(),
                category: ProductCategory::Lumber,
                unit: Some("un".to_string()),
                quantity: 2.0,
                discount_percent: 0.0,
                unit_price: 3500,
                subtotal: 7000,
                cut: Some(CutDetail {
                    height: 2.0,
                    width: 3.0,
                    length: 2.5,
                    price_per_foot: 850,
                    planed: false,
                }),
            }],
            created_at: Default::default(),
            updated_at: Default::default(),
        }
    }

    #[test]
    fn render_remito_produces_a_pdf() {
        let data = RemitoData::from_sale(&sample_sale(), Some("Miguel".to_string()));
        let bytes = render_remito(&data).expect("remito should render");

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn remito_title_carries_the_document_number() {
        let sale_data = RemitoData::from_sale(&sample_sale(), None);
        assert_eq!(sale_data.title, "REMITO - VENTA N° 12");
        assert_eq!(sale_data.date, "02/05/2025");
    }
}
