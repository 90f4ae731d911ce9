use crate::util::{month_label, month_ordinal};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// A calendar month, stored as its first day. Ordering is `(year, month)`,
/// which is the only order the accumulator and the synthesizer ever walk in.
/// The only way in is [`Period::new`], so every value is a real month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(NaiveDate);

impl Period {
    /// Returns `None` for anything that is not a real calendar month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Period)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Canonical upper-case month abbreviation, as written in the CSV outputs.
    pub fn month_label(&self) -> &'static str {
        month_label(self.month()).unwrap_or("")
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

/// One monthly inflation rate, in percent. `None` when the source cell held
/// something that was not a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateObservation {
    pub period: Period,
    pub rate: Option<f64>,
}

/// Row of the inflation CSV (`ANO,MES,INFLACAO_NO_MES`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationRow {
    #[serde(rename = "ANO")]
    pub year: i32,
    #[serde(rename = "MES")]
    pub month: String,
    #[serde(rename = "INFLACAO_NO_MES")]
    pub rate: Option<f64>,
}

impl From<&RateObservation> for InflationRow {
    fn from(obs: &RateObservation) -> Self {
        InflationRow {
            year: obs.period.year(),
            month: obs.period.month_label().to_string(),
            rate: obs.rate,
        }
    }
}

/// A store's purchases at the base period; one row of the combined sales
/// table produced by the ETL step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub uf: String,
    pub id: String,
    pub pet_shop: String,
    #[serde(rename = "compra_maio_2023_(kg)")]
    pub base_quantity: f64,
}

/// A synthesized sales volume for one store in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedRecord {
    pub period: Period,
    pub uf: String,
    pub id: String,
    pub pet_shop: String,
    pub quantity: i64,
}

/// CSV shape of [`ReconstructedRecord`]
/// (`ano,mes,uf,id,pet_shop,volume_vendas_(kg)`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockSalesRow {
    pub ano: i32,
    pub mes: String,
    pub uf: String,
    pub id: String,
    pub pet_shop: String,
    #[serde(rename = "volume_vendas_(kg)")]
    pub volume: i64,
}

impl From<&ReconstructedRecord> for MockSalesRow {
    fn from(r: &ReconstructedRecord) -> Self {
        MockSalesRow {
            ano: r.period.year(),
            mes: r.period.month_label().to_string(),
            uf: r.uf.clone(),
            id: r.id.clone(),
            pet_shop: r.pet_shop.clone(),
            volume: r.quantity,
        }
    }
}

impl MockSalesRow {
    /// `None` when `mes` is not a known month label.
    pub fn to_record(&self) -> Option<ReconstructedRecord> {
        let period = month_ordinal(&self.mes).and_then(|m| Period::new(self.ano, m))?;
        Some(ReconstructedRecord {
            period,
            uf: self.uf.clone(),
            id: self.id.clone(),
            pet_shop: self.pet_shop.clone(),
            quantity: self.volume,
        })
    }
}

/// One bar of a dashboard ranking.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct RankingRow {
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Volume (kg)")]
    pub total: i64,
}
