pub mod applications;
pub mod campaigns;
pub mod dashboard;
pub mod health;
pub mod profiles;
pub mod review;
