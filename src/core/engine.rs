use tracing::debug;

use super::error::{PlannerError, PlannerResult};
use super::types::{
    ChartPoint, DrawdownProjection, LAKH, OptionComparison, PensionProjection, RetirementInputs,
};

pub fn simulate_pension_option(
    years_joint: i32,
    years_single: i32,
    discount_rate: f64,
    inflation_rate: f64,
    starting_expense: f64,
    payment_joint: f64,
    payment_single: f64,
) -> PensionProjection {
    let years = year_count(years_joint.saturating_add(years_single));
    let mut net_cashflows = Vec::with_capacity(years);
    let mut savings_balance = Vec::with_capacity(years);
    let mut savings = 0.0;

    for year in 1..=years as i32 {
        let pension = if year <= years_joint {
            payment_joint
        } else {
            payment_single
        };
        let net = pension - inflated_expense(starting_expense, inflation_rate, year);
        net_cashflows.push(net);
        savings = (savings + net) * (1.0 + discount_rate);
        savings_balance.push(savings);
    }

    PensionProjection {
        net_cashflows,
        savings_balance,
    }
}

/// Withdraws the full inflation-adjusted expense every year, even when that
/// takes the balance below zero. A negative balance keeps compounding at
/// `rate` for the remaining years; there is no floor and no early stop.
pub fn simulate_drawdown_option(
    principal: f64,
    starting_expense: f64,
    rate: f64,
    total_years: i32,
    inflation_rate: f64,
) -> DrawdownProjection {
    let years = year_count(total_years);
    let mut withdrawals = Vec::with_capacity(years);
    let mut balance_history = Vec::with_capacity(years);
    let mut balance = principal;

    for year in 1..=years as i32 {
        let withdrawal = inflated_expense(starting_expense, inflation_rate, year);
        withdrawals.push(withdrawal);
        balance = (balance - withdrawal) * (1.0 + rate);
        balance_history.push(balance);
    }

    DrawdownProjection {
        withdrawals,
        balance_history,
    }
}

pub fn present_value(cashflows: &[f64], rate: f64) -> PlannerResult<f64> {
    let growth = 1.0 + rate;
    if growth == 0.0 && !cashflows.is_empty() {
        return Err(PlannerError::DomainError {
            context: format!("present value discount factor is zero at rate {rate}"),
        });
    }

    Ok(cashflows
        .iter()
        .enumerate()
        .map(|(idx, cashflow)| cashflow / growth.powi(idx as i32 + 1))
        .sum())
}

pub fn discount_lump_sum(future_value: f64, rate: f64, years: i32) -> PlannerResult<f64> {
    if years == 0 {
        return Ok(future_value);
    }
    let growth = 1.0 + rate;
    if growth == 0.0 {
        return Err(PlannerError::DomainError {
            context: format!("lump-sum discount factor is zero at rate {rate} over {years} years"),
        });
    }
    Ok(future_value / growth.powi(years))
}

pub fn compare_options(inputs: &RetirementInputs) -> PlannerResult<OptionComparison> {
    let total_years = inputs.total_years();
    let pension = simulate_pension_option(
        inputs.years_joint,
        inputs.years_single,
        inputs.discount_rate,
        inputs.inflation_rate,
        inputs.starting_expense,
        inputs.payment_joint,
        inputs.payment_single,
    );
    let drawdown = simulate_drawdown_option(
        inputs.principal,
        inputs.starting_expense,
        inputs.discount_rate,
        total_years,
        inputs.inflation_rate,
    );

    let pension_present_value = present_value(&pension.net_cashflows, inputs.discount_rate)?;
    let drawdown_withdrawals_present_value =
        present_value(&drawdown.withdrawals, inputs.discount_rate)?;
    let drawdown_terminal_present_value = discount_lump_sum(
        drawdown.terminal_balance(inputs.principal),
        inputs.discount_rate,
        year_count(total_years) as i32,
    )?;
    let drawdown_present_value =
        drawdown_withdrawals_present_value + drawdown_terminal_present_value;

    debug!(
        total_years,
        pension_present_value, drawdown_present_value, "compared retirement options"
    );

    let chart = chart_points(&pension.savings_balance, &drawdown.balance_history);
    Ok(OptionComparison {
        total_years,
        pension,
        drawdown,
        pension_present_value,
        drawdown_withdrawals_present_value,
        drawdown_terminal_present_value,
        drawdown_present_value,
        chart,
    })
}

fn chart_points(savings: &[f64], balance: &[f64]) -> Vec<ChartPoint> {
    savings
        .iter()
        .zip(balance)
        .enumerate()
        .map(|(idx, (saved, remaining))| ChartPoint {
            year: idx as u32 + 1,
            savings_lakhs: saved / LAKH,
            balance_lakhs: remaining / LAKH,
        })
        .collect()
}

fn inflated_expense(starting_expense: f64, inflation_rate: f64, year: i32) -> f64 {
    starting_expense * (1.0 + inflation_rate).powi(year - 1)
}

fn year_count(total_years: i32) -> usize {
    total_years.max(0) as usize
}
