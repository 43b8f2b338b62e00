pub mod contract_type;
pub mod country;
pub mod remote_type;
pub mod salary_period;
