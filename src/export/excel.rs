//! Excel生成
//!
//! 1シートに全品目を1行ずつ出力する。

use crate::error::Result;
use procure_scope_common::AnnotatedItem;
use rust_xlsxwriter::*;
use std::path::Path;

/// 数値として書き込む列
const NUMERIC_COLUMNS: &[usize] = &[6, 8, 9];

/// 列幅（文字数）
fn column_width(column: &str) -> f64 {
    match column {
        "Item Name" | "Final Specification" | "Vendor Certifications" => 30.0,
        "Recommended Vendor" | "Vendor Email" => 24.0,
        _ => 16.0,
    }
}

pub fn generate_excel(items: &[AnnotatedItem], output_path: &Path, sheet_name: &str) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x1F4E78))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin);

    let value_format = Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let number_format = Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let columns = AnnotatedItem::columns();
    for (col, name) in columns.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, column_width(name))?;
        worksheet.write_string_with_format(0, col, *name, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (idx, item) in items.iter().enumerate() {
        let row = idx as u32 + 1;
        let numbers = [
            item.item.lead_time_days,
            item.item.similarity_score,
            item.estimated_cost_usd,
        ];

        for (col, value) in item.values().iter().enumerate() {
            match NUMERIC_COLUMNS.iter().position(|&c| c == col) {
                Some(n) => {
                    worksheet.write_number_with_format(row, col as u16, numbers[n], &number_format)?;
                }
                None => {
                    worksheet.write_string_with_format(row, col as u16, value, &value_format)?;
                }
            }
        }
    }

    workbook.save(output_path)?;
    Ok(())
}
