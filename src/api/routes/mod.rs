pub mod campuses;
