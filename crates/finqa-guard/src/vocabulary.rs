//! The single domain vocabulary, grouped by the statement a term belongs to.
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
}

pub const INCOME_STATEMENT: &[&str] = &[
    "revenue", "sales", "top line", "turnover",
    "income", "profit", "net profit", "net earnings", "net income", "loss",
    "operating income", "operating profit", "operating margin",
    "gross margin", "gross profit",
    "cost", "expense", "cost of goods sold", "cogs",
    "interest expense", "tax expense", "non-operating income", "other expenses", "operating expense",
    "ebit", "earnings before interest and taxes",
    "ebitda", "earnings before interest, taxes, depreciation, and amortization",
    "eps", "earnings per share", "diluted eps", "diluted earnings per share",
];

pub const BALANCE_SHEET: &[&str] = &[
    "assets", "current assets", "non-current assets", "long-term assets",
    "cash", "cash equivalents", "inventory", "receivables", "accounts receivable",
    "marketable securities", "property, plant & equipment", "pp&e", "intangible assets", "goodwill",
    "liabilities", "current liabilities", "short-term liabilities", "long-term liabilities",
    "non-current liabilities", "accounts payable", "debt", "short-term debt", "long-term debt",
    "equity", "shareholders’ equity", "shareholders' equity", "share capital", "preferred stock",
    "common stock", "treasury stock", "retained earnings", "accumulated profit",
];

pub const CASH_FLOW: &[&str] = &[
    "cash flow", "cashflow", "cfo", "cash from operations", "operating cash flow",
    "investing activities", "cash used in investing", "financing activities", "cash from financing",
    "free cash flow", "fcf", "capital expenditures", "capex",
    "net change in cash", "net increase in cash", "net decrease in cash",
    "dividends paid", "stock repurchase", "issuance of debt", "repayment of debt",
    "interest received", "interest paid",
];

/// Whole-word, case-insensitive matcher over every statement group.
#[derive(Debug, Clone)]
pub struct DomainVocabulary {
    groups: Vec<(StatementType, Regex)>,
}

impl DomainVocabulary {
    pub fn standard() -> Result<Self> {
        Self::from_groups(&[
            (StatementType::IncomeStatement, INCOME_STATEMENT),
            (StatementType::BalanceSheet, BALANCE_SHEET),
            (StatementType::CashFlow, CASH_FLOW),
        ])
    }

    pub fn from_groups(groups: &[(StatementType, &[&str])]) -> Result<Self> {
        let groups = groups
            .iter()
            .map(|(kind, terms)| {
                let alternation = terms.iter().map(|t| regex::escape(&t.to_lowercase())).collect::<Vec<_>>().join("|");
                Ok((*kind, Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { groups })
    }

    /// First statement group with a whole-word match in `query`.
    pub fn classify(&self, query: &str) -> Option<StatementType> {
        self.groups.iter().find(|(_, re)| re.is_match(query)).map(|(kind, _)| *kind)
    }
}
