pub mod persistent_jobs;
