mod engine;
mod error;
mod format;
mod types;

pub use engine::{
    compare_options, discount_lump_sum, present_value, simulate_drawdown_option,
    simulate_pension_option,
};
pub use error::{PlannerError, PlannerResult};
pub use format::format_grouped;
pub use types::{
    ChartPoint, DEFAULT_DISCOUNT_RATE, DEFAULT_FUTURE_VALUE, DEFAULT_INFLATION_RATE,
    DEFAULT_PAYMENT_JOINT, DEFAULT_PAYMENT_SINGLE, DEFAULT_PRINCIPAL, DEFAULT_PV_RATE,
    DEFAULT_PV_YEARS, DEFAULT_STARTING_EXPENSE, DEFAULT_YEARS_JOINT, DEFAULT_YEARS_SINGLE,
    DrawdownProjection, LAKH, OptionComparison, PensionProjection, RetirementInputs,
};
