use std::fmt::Write as _;

use clap::{Args, Parser, Subcommand};

use crate::api::build_compare_response;
use crate::core::{
    DEFAULT_DISCOUNT_RATE, DEFAULT_FUTURE_VALUE, DEFAULT_INFLATION_RATE, DEFAULT_PAYMENT_JOINT,
    DEFAULT_PAYMENT_SINGLE, DEFAULT_PRINCIPAL, DEFAULT_PV_RATE, DEFAULT_PV_YEARS,
    DEFAULT_STARTING_EXPENSE, DEFAULT_YEARS_JOINT, DEFAULT_YEARS_SINGLE, LAKH, PlannerError,
    RetirementInputs, compare_options, discount_lump_sum, format_grouped,
};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(
    name = "retireplan",
    about = "Retirement planning calculators (pension vs fixed-principal drawdown, present value)"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level used when RUST_LOG is not set"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Serve the dashboard and JSON API")]
    Serve(ServeArgs),
    #[command(about = "Compare the pension and drawdown options")]
    Compare(CompareArgs),
    #[command(about = "Present value of a single future amount")]
    Pv(PvArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "RETIREPLAN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(
        long,
        default_value_t = DEFAULT_PAYMENT_JOINT,
        help = "Annual pension payment while both spouses are alive"
    )]
    pub payment_joint: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_PAYMENT_SINGLE,
        help = "Annual pension payment in the one-survivor period"
    )]
    pub payment_single: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS_JOINT, allow_negative_numbers = true)]
    pub years_joint: i32,
    #[arg(long, default_value_t = DEFAULT_YEARS_SINGLE, allow_negative_numbers = true)]
    pub years_single: i32,
    #[arg(long, default_value_t = DEFAULT_STARTING_EXPENSE)]
    pub starting_expense: f64,
    #[arg(long, default_value_t = DEFAULT_PRINCIPAL)]
    pub principal: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_DISCOUNT_RATE,
        allow_negative_numbers = true,
        help = "Annual interest/discount rate as a fraction (0.07 = 7%)"
    )]
    pub discount_rate: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_INFLATION_RATE,
        allow_negative_numbers = true,
        help = "Annual inflation rate as a fraction"
    )]
    pub inflation_rate: f64,
    #[arg(long, help = "Print the full comparison as JSON")]
    pub json: bool,
}

impl Default for CompareArgs {
    fn default() -> Self {
        let inputs = RetirementInputs::default();
        Self {
            payment_joint: inputs.payment_joint,
            payment_single: inputs.payment_single,
            years_joint: inputs.years_joint,
            years_single: inputs.years_single,
            starting_expense: inputs.starting_expense,
            principal: inputs.principal,
            discount_rate: inputs.discount_rate,
            inflation_rate: inputs.inflation_rate,
            json: false,
        }
    }
}

impl From<&CompareArgs> for RetirementInputs {
    fn from(args: &CompareArgs) -> Self {
        RetirementInputs {
            payment_joint: args.payment_joint,
            payment_single: args.payment_single,
            years_joint: args.years_joint,
            years_single: args.years_single,
            starting_expense: args.starting_expense,
            principal: args.principal,
            discount_rate: args.discount_rate,
            inflation_rate: args.inflation_rate,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PvArgs {
    #[arg(long, default_value_t = DEFAULT_FUTURE_VALUE, allow_negative_numbers = true)]
    pub future_value: f64,
    #[arg(long, default_value_t = DEFAULT_PV_RATE, allow_negative_numbers = true)]
    pub rate: f64,
    #[arg(long, default_value_t = DEFAULT_PV_YEARS, allow_negative_numbers = true)]
    pub years: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Planner(#[from] PlannerError),
    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn render_compare(args: &CompareArgs) -> Result<String, CliError> {
    let inputs = RetirementInputs::from(args);
    let comparison = compare_options(&inputs)?;

    if args.json {
        let response = build_compare_response(&comparison);
        return Ok(format!("{}\n", serde_json::to_string_pretty(&response)?));
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Option 1 (Pension with Saving) Present Value: {}",
        format_grouped(comparison.pension_present_value, 0)
    );
    let _ = writeln!(
        out,
        "Option 2 (Fixed Instrument) Present Value: {}",
        format_grouped(comparison.drawdown_present_value, 0)
    );
    if comparison.chart.is_empty() {
        return Ok(out);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>4} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Net cashflow", "Savings (L)", "Withdrawal", "Balance (L)"
    );
    let _ = writeln!(out, "{}", "-".repeat(64));
    for (idx, point) in comparison.chart.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4} {:>14} {:>14.2} {:>14} {:>14.2}",
            point.year,
            format_grouped(comparison.pension.net_cashflows[idx], 0),
            point.savings_lakhs,
            format_grouped(comparison.drawdown.withdrawals[idx], 0),
            point.balance_lakhs,
        );
    }
    let _ = writeln!(out, "\nBalances shown in lakhs (1 L = {}).", format_grouped(LAKH, 0));
    Ok(out)
}

pub fn render_pv(args: &PvArgs) -> Result<String, CliError> {
    let pv = discount_lump_sum(args.future_value, args.rate, args.years)?;
    Ok(format!("Present Value (PV): {}\n", format_grouped(pv, 2)))
}
