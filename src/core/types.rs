use serde::Serialize;

pub const LAKH: f64 = 1e5;

pub const DEFAULT_PAYMENT_JOINT: f64 = 600_000.0;
pub const DEFAULT_PAYMENT_SINGLE: f64 = 300_000.0;
pub const DEFAULT_YEARS_JOINT: i32 = 12;
pub const DEFAULT_YEARS_SINGLE: i32 = 3;
pub const DEFAULT_STARTING_EXPENSE: f64 = 360_000.0;
pub const DEFAULT_PRINCIPAL: f64 = 6_000_000.0;
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.07;
pub const DEFAULT_INFLATION_RATE: f64 = 0.05;

pub const DEFAULT_FUTURE_VALUE: f64 = 1_000_000.0;
pub const DEFAULT_PV_RATE: f64 = 0.03;
pub const DEFAULT_PV_YEARS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetirementInputs {
    pub payment_joint: f64,
    pub payment_single: f64,
    pub years_joint: i32,
    pub years_single: i32,
    pub starting_expense: f64,
    pub principal: f64,
    pub discount_rate: f64,
    pub inflation_rate: f64,
}

impl RetirementInputs {
    pub fn total_years(&self) -> i32 {
        self.years_joint.saturating_add(self.years_single)
    }
}

impl Default for RetirementInputs {
    fn default() -> Self {
        Self {
            payment_joint: DEFAULT_PAYMENT_JOINT,
            payment_single: DEFAULT_PAYMENT_SINGLE,
            years_joint: DEFAULT_YEARS_JOINT,
            years_single: DEFAULT_YEARS_SINGLE,
            starting_expense: DEFAULT_STARTING_EXPENSE,
            principal: DEFAULT_PRINCIPAL,
            discount_rate: DEFAULT_DISCOUNT_RATE,
            inflation_rate: DEFAULT_INFLATION_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionProjection {
    pub net_cashflows: Vec<f64>,
    pub savings_balance: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownProjection {
    pub withdrawals: Vec<f64>,
    pub balance_history: Vec<f64>,
}

impl DrawdownProjection {
    pub fn terminal_balance(&self, principal: f64) -> f64 {
        self.balance_history.last().copied().unwrap_or(principal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub year: u32,
    pub savings_lakhs: f64,
    pub balance_lakhs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionComparison {
    pub total_years: i32,
    pub pension: PensionProjection,
    pub drawdown: DrawdownProjection,
    pub pension_present_value: f64,
    pub drawdown_withdrawals_present_value: f64,
    pub drawdown_terminal_present_value: f64,
    pub drawdown_present_value: f64,
    pub chart: Vec<ChartPoint>,
}
