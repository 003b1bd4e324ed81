
mod health_check;
mod payments;
mod registrations;
