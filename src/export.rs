//! Excel export functionality.

use crate::models::{Customer, QuotationSummary};
use crate::quote::{QuotationEditor, display_price, format_amount};
use crate::reports::{ReportSummary, format_long_date};
use chrono::{Local, NaiveDate};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

fn amount_format() -> Format {
    Format::new().set_num_format("#,##0.00")
}

/// Write a styled header row and set column widths.
fn write_header_row(worksheet: &mut Worksheet, row: u32, columns: &[(&str, f64)]) -> Result<(), XlsxError> {
    let format = header_format();
    for (col, (title, width)) in columns.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, *title, &format)?;
        worksheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

/// Autofilter over the data block and freeze everything above it.
fn finish_table(worksheet: &mut Worksheet, header_row: u32, rows: usize, columns: usize) -> Result<(), XlsxError> {
    if rows > 0 {
        worksheet.autofilter(header_row, 0, header_row + rows as u32, (columns - 1) as u16)?;
    }
    worksheet.set_freeze_panes(header_row + 1, 0)?;
    Ok(())
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(format_long_date).unwrap_or_default()
}

/// Export the quotation list as shown in the Quotations panel.
pub fn export_quotations_to_excel(data: &[&QuotationSummary], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Quotations")?;

    let columns = [
        ("Quotation No", 15.0),
        ("Quotation Name", 30.0),
        ("Customer", 30.0),
        ("Created Date", 18.0),
        ("Created By", 15.0),
        ("Approved Date", 18.0),
        ("Approved By", 15.0),
        ("Status", 18.0),
        ("Amount", 15.0),
    ];
    write_header_row(worksheet, 0, &columns)?;

    let amount = amount_format();
    for (idx, q) in data.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, &q.quotation_code)?;
        worksheet.write_string(row, 1, &q.quotation_name)?;
        worksheet.write_string(row, 2, &q.cus_name)?;
        worksheet.write_string(row, 3, date_text(q.quotation_date))?;
        worksheet.write_string(row, 4, &q.created_by)?;
        worksheet.write_string(row, 5, date_text(q.quotation_approved_date))?;
        worksheet.write_string(row, 6, &q.approved_by)?;
        worksheet.write_string(row, 7, q.quotation_status.label())?;
        worksheet.write_number_with_format(row, 8, q.total_quotation_amount, &amount)?;
    }

    finish_table(worksheet, 0, data.len(), columns.len())?;
    workbook.save(path)?;
    Ok(())
}

/// Export the customer report.
pub fn export_customer_report(data: &[&Customer], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Customer Report")?;

    let columns = [
        ("Customer Code", 15.0),
        ("Customer Name", 30.0),
        ("Address", 40.0),
        ("VAT No", 18.0),
        ("Contact Person", 25.0),
        ("Contact Number", 15.0),
        ("Details", 40.0),
    ];
    write_header_row(worksheet, 0, &columns)?;

    for (idx, c) in data.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_string(row, 0, &c.cus_code)?;
        worksheet.write_string(row, 1, &c.cus_name)?;
        worksheet.write_string(row, 2, &c.cus_addr)?;
        worksheet.write_string(row, 3, &c.cus_vat_no)?;
        worksheet.write_string(row, 4, &c.contact_person)?;
        worksheet.write_string(row, 5, &c.contact_p_no)?;
        worksheet.write_string(row, 6, &c.c_details)?;
    }

    finish_table(worksheet, 0, data.len(), columns.len())?;
    workbook.save(path)?;
    Ok(())
}

/// Export the quotation report: summary block, then the filtered rows.
pub fn export_quotation_report(data: &[&QuotationSummary], summary: &ReportSummary, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Quotation Report")?;

    let bold = Format::new().set_bold();
    worksheet.write_string_with_format(0, 0, "Quotation Summary Report", &bold.clone().set_font_size(14))?;
    worksheet.write_string_with_format(1, 0, "Total Quotations:", &bold)?;
    worksheet.write_number(1, 1, summary.total as f64)?;
    worksheet.write_string_with_format(2, 0, "Approved Quotations:", &bold)?;
    worksheet.write_number(2, 1, summary.approved as f64)?;
    worksheet.write_string_with_format(3, 0, "Pending Quotations:", &bold)?;
    worksheet.write_number(3, 1, summary.pending as f64)?;

    // Row 4 stays blank.
    const HEADER_ROW: u32 = 5;
    let columns = [
        ("Customer", 30.0),
        ("Quotation Name", 30.0),
        ("Quotation Amount", 18.0),
        ("Sales Person", 25.0),
        ("Created Date", 18.0),
    ];
    write_header_row(worksheet, HEADER_ROW, &columns)?;

    let amount = amount_format();
    for (idx, q) in data.iter().enumerate() {
        let row = HEADER_ROW + 1 + idx as u32;
        worksheet.write_string(row, 0, &q.cus_name)?;
        worksheet.write_string(row, 1, &q.quotation_name)?;
        worksheet.write_number_with_format(row, 2, q.total_quotation_amount, &amount)?;
        worksheet.write_string(row, 3, &q.sales_p_name)?;
        worksheet.write_string(row, 4, date_text(q.quotation_date))?;
    }

    finish_table(worksheet, HEADER_ROW, data.len(), columns.len())?;
    workbook.save(path)?;
    Ok(())
}

/// Export an approved quotation with its line items and grand total.
pub fn export_quotation_detail(editor: &QuotationEditor, path: &Path) -> Result<(), XlsxError> {
    let header = editor.header();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Quotation")?;

    let bold = Format::new().set_bold();
    let info = [
        ("Quotation No", header.quotation_code.clone()),
        ("Quotation", header.quotation_name.clone()),
        ("Date", date_text(header.quotation_date)),
        ("Customer", header.customer_name.clone()),
        ("Address", header.customer_address.clone()),
        ("Company", header.company_name.clone()),
        ("Sales Person", header.salesperson_name.clone()),
        ("Status", header.status.label().to_string()),
    ];
    for (row, (label, value)) in info.iter().enumerate() {
        worksheet.write_string_with_format(row as u32, 0, *label, &bold)?;
        worksheet.write_string(row as u32, 1, value)?;
    }

    let header_row = info.len() as u32 + 1;
    let columns = [
        ("Item", 30.0),
        ("Description", 40.0),
        ("Warranty", 15.0),
        ("Qty", 8.0),
        ("Unit Price", 15.0),
        ("VAT %", 8.0),
        ("Subtotal", 15.0),
        ("Unit Price incl. VAT", 20.0),
        ("Total incl. VAT", 18.0),
    ];
    write_header_row(worksheet, header_row, &columns)?;

    let right = Format::new().set_align(FormatAlign::Right);
    let lines = editor.lines();
    for (idx, line) in lines.iter().enumerate() {
        let row = header_row + 1 + idx as u32;
        let amounts = line.amounts();
        worksheet.write_string(row, 0, &line.item_name)?;
        worksheet.write_string(row, 1, &line.description)?;
        worksheet.write_string(row, 2, &line.warranty)?;
        worksheet.write_number(row, 3, line.quantity() as f64)?;
        worksheet.write_string_with_format(row, 4, display_price(&amounts, amounts.unit_price), &right)?;
        worksheet.write_number(row, 5, line.vat())?;
        worksheet.write_string_with_format(row, 6, display_price(&amounts, amounts.subtotal), &right)?;
        worksheet.write_string_with_format(row, 7, display_price(&amounts, amounts.unit_price_incl_vat), &right)?;
        worksheet.write_string_with_format(row, 8, display_price(&amounts, amounts.total_incl_vat), &right)?;
    }

    let total_row = header_row + 1 + lines.len() as u32;
    worksheet.write_string_with_format(total_row, 7, "Grand Total", &bold)?;
    worksheet.write_string_with_format(total_row, 8, format_amount(editor.grand_total()), &bold.clone().set_align(FormatAlign::Right))?;

    let terms = [
        ("Price Validity", &editor.terms.price_validity),
        ("Delivery", &editor.terms.delivery),
        ("Payment Terms", &editor.terms.pay_terms),
        ("Warranty Void", &editor.terms.warranty_void),
        ("Taxes & Duties", &editor.terms.duties_taxes),
        ("Stock Availability", &editor.terms.stock_avail),
        ("Remarks", &editor.terms.remarks),
    ];
    for (offset, (label, value)) in terms.iter().enumerate() {
        let row = total_row + 2 + offset as u32;
        worksheet.write_string_with_format(row, 0, *label, &bold)?;
        worksheet.write_string(row, 1, value.as_str())?;
    }

    worksheet.set_freeze_panes(header_row + 1, 0)?;
    workbook.save(path)?;
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel Files", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuotationDetailRow, QuotationStatus};

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("quotation_report");
        assert!(name.starts_with("quotation_report_"));
        assert!(name.ends_with(".xlsx"));
        // prefix + '_' + YYYYmmdd_HHMMSS + ".xlsx"
        assert_eq!(name.len(), "quotation_report_".len() + 15 + 5);
    }

    #[test]
    fn test_quotation_report_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let q = QuotationSummary {
            quotation_code: "Q-1".to_string(),
            quotation_status: QuotationStatus::Approved,
            total_quotation_amount: 1500.0,
            ..Default::default()
        };
        let rows = vec![&q];
        let summary = ReportSummary::of(&rows);
        export_quotation_report(&rows, &summary, &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_empty_customer_report_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.xlsx");
        export_customer_report(&[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_quotation_detail_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotation.xlsx");
        let rows = vec![
            QuotationDetailRow {
                quotation_code: "Q-9".to_string(),
                quotation_status: QuotationStatus::ReApproved,
                item_id: "IT-1".to_string(),
                item_quantity: 2,
                quotation_unit_price: 100.0,
                quotation_item_vat: 10.0,
                ..Default::default()
            },
            QuotationDetailRow {
                quotation_code: "Q-9".to_string(),
                quotation_status: QuotationStatus::ReApproved,
                item_id: "IT-2".to_string(),
                item_quantity: 1,
                ..Default::default()
            },
        ];
        let editor = QuotationEditor::from_rows(&rows).unwrap();
        export_quotation_detail(&editor, &path).unwrap();
        assert!(path.exists());
    }
}
