mod cancellation;
mod closed_loop;
mod divergence;
mod plotting;
mod startup;
