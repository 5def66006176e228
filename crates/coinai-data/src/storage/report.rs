//! XLSX 리포트 저장소.
//!
//! 시트 두 개(`Ações`, `Moedas`)로 구성된 워크북을 생성합니다.
//! - 열 너비: 내용 길이 + 2
//! - 헤더: 굵게
//! - 모든 셀: 가운데 정렬, 얇은 테두리
//! - 추세 열 조건부 서식: `Up` 초록, `Down` 빨강 (리터럴 텍스트 비교)

use std::fs;
use std::path::PathBuf;

use coinai_core::{format_timestamp, ExchangeRateRecord, QuoteRecord, Trend};
use rust_xlsxwriter::{
    Color, ConditionalFormatCell, ConditionalFormatCellRule, Format, FormatAlign, FormatBorder,
    Workbook, Worksheet,
};
use tracing::info;

use super::unique_path;
use crate::error::Result;

const UP_FILL: u32 = 0x00FF00;
const DOWN_FILL: u32 = 0xFF0000;

/// 시트 셀 값.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn display_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().chars().count(),
        }
    }
}

/// 시트 하나의 내용.
#[derive(Debug)]
struct SheetData {
    name: &'static str,
    headers: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
    trend_col: u16,
}

impl SheetData {
    fn stocks(batch: &[QuoteRecord]) -> Self {
        Self {
            name: "Ações",
            headers: &[
                "EMPRESA",
                "AÇÃO",
                "COTAÇÃO",
                "VARIAÇÃO PERCENTUAL",
                "HORÁRIO",
                "TENDÊNCIA",
                "LINK",
            ],
            rows: batch
                .iter()
                .map(|r| {
                    vec![
                        Cell::Text(r.label.clone()),
                        Cell::Text(r.symbol.clone()),
                        Cell::Number(r.price),
                        Cell::Number(r.percent_change),
                        Cell::Text(format_timestamp(&r.captured_at)),
                        Cell::Text(r.trend.as_str().to_string()),
                        Cell::Text(r.reference_url.clone()),
                    ]
                })
                .collect(),
            trend_col: 5,
        }
    }

    fn currencies(batch: &[ExchangeRateRecord]) -> Self {
        Self {
            name: "Moedas",
            headers: &[
                "NOME",
                "MOEDA",
                "COTAÇÃO",
                "VARIAÇÃO PERCENTUAL",
                "TENDÊNCIA",
                "DATA E HORÁRIO",
            ],
            rows: batch
                .iter()
                .map(|r| {
                    vec![
                        Cell::Text(r.label.clone()),
                        Cell::Text(r.code.clone()),
                        Cell::Number(r.rate),
                        Cell::Number(r.percent_change),
                        Cell::Text(r.trend.as_str().to_string()),
                        Cell::Text(format_timestamp(&r.captured_at)),
                    ]
                })
                .collect(),
            trend_col: 4,
        }
    }

    /// 열별 너비: 헤더와 모든 셀 중 가장 긴 값 + 2.
    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(Cell::display_len)
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                longest + 2
            })
            .collect()
    }
}

fn trend_rule(trend: Trend, fill: u32) -> ConditionalFormatCell {
    let literal = format!("\"{}\"", trend.as_str());
    ConditionalFormatCell::new()
        .set_rule(ConditionalFormatCellRule::EqualTo(literal.as_str()))
        .set_format(Format::new().set_background_color(Color::RGB(fill)))
}

fn write_sheet(sheet: &mut Worksheet, data: &SheetData) -> Result<()> {
    sheet.set_name(data.name)?;

    let cell_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let header_format = cell_format.clone().set_bold();

    for (col, header) in data.headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, row) in data.rows.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    sheet.write_string_with_format(row_num, col as u16, s, &cell_format)?
                }
                Cell::Number(n) => {
                    sheet.write_number_with_format(row_num, col as u16, *n, &cell_format)?
                }
            };
        }
    }

    for (col, width) in data.column_widths().into_iter().enumerate() {
        sheet.set_column_width(col as u16, width as f64)?;
    }

    if !data.rows.is_empty() {
        let last_row = data.rows.len() as u32;
        for (trend, fill) in [(Trend::Up, UP_FILL), (Trend::Down, DOWN_FILL)] {
            sheet.add_conditional_format(
                1,
                data.trend_col,
                last_row,
                data.trend_col,
                &trend_rule(trend, fill),
            )?;
        }
    }

    Ok(())
}

/// XLSX 리포트 저장소.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// 내보내기 디렉토리를 지정하여 생성.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 주식/통화 배치를 하나의 워크북으로 저장하고 경로를 반환.
    pub fn write(
        &self,
        stocks: &[QuoteRecord],
        currencies: &[ExchangeRateRecord],
        file_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = unique_path(&self.dir, file_name);

        let mut workbook = Workbook::new();
        write_sheet(workbook.add_worksheet(), &SheetData::stocks(stocks))?;
        write_sheet(workbook.add_worksheet(), &SheetData::currencies(currencies))?;
        workbook.save(&path)?;

        info!(
            stocks = stocks.len(),
            currencies = currencies.len(),
            path = %path.display(),
            "XLSX 리포트 저장"
        );

        Ok(path)
    }
}
