pub type Date = chrono::NaiveDate;
