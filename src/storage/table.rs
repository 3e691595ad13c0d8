//! CSV table storage
//!
//! Each entity type lives in its own `<name>.csv` file: a fixed header line
//! followed by one record per entity. Saving always rewrites the whole file.
//! Uses file locking for concurrent access safety.

use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use log::{debug, warn};

use super::csv::{format_line, parse_line, split_records};
use super::record::{CsvRecord, RecordError};

/// Store for one entity type in CSV format
pub struct CsvTable<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T: CsvRecord> CsvTable<T> {
    /// Creates a table backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Creates the table for a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(T::FILE_NAME))
    }

    /// Returns the path to the table file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of the writer lock file
    pub fn lock_path(&self) -> PathBuf {
        self.path.with_extension("csv.lock")
    }

    /// Returns the header line
    pub fn header() -> String {
        T::HEADER.join(",")
    }

    /// Writes a header-only file if none exists yet
    pub fn ensure(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.write_all(&[])?;
        Ok(true)
    }

    /// Reads all records from the table
    ///
    /// A missing file yields no records. The first line is treated as the
    /// header and skipped. Rows that cannot be turned into an entity are
    /// dropped: silently when short, with a warning when a value is invalid.
    pub fn read_all(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            debug!("{} does not exist, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open table: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .with_context(|| format!("Failed to acquire read lock on {}", self.path.display()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read table: {}", self.path.display()))?;

        let text = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = text {
            warn!(
                "{}: invalid UTF-8 replaced with U+FFFD",
                self.path.display()
            );
        }

        let mut rows = Vec::new();
        for (index, record) in split_records(&text).iter().enumerate().skip(1) {
            let fields = parse_line(record);
            match T::from_fields(&fields) {
                Ok(row) => rows.push(row),
                Err(err @ RecordError::TooFewFields { .. }) => {
                    debug!("{}: skipping record {}: {}", T::FILE_NAME, index, err);
                }
                Err(err) => {
                    warn!("{}: skipping record {}: {}", T::FILE_NAME, index, err);
                }
            }
        }

        debug!("Loaded {} record(s) from {}", rows.len(), self.path.display());

        // Lock is released when file is dropped
        Ok(rows)
    }

    /// Writes all records to the table (full rewrite)
    pub fn write_all(&self, rows: &[T]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Held until the rename below has happened
        let lock_path = self.lock_path();
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
        lock.lock_exclusive()
            .with_context(|| format!("Failed to acquire write lock on {}", lock_path.display()))?;

        // Write to temp file first
        let temp_path = self.path.with_extension("csv.tmp");

        {
            let file = File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);

            writeln!(writer, "{}", Self::header()).context("Failed to write header")?;
            for row in rows {
                writeln!(writer, "{}", format_line(&row.to_fields()))
                    .context("Failed to write record")?;
            }

            writer.flush().context("Failed to flush table")?;
        }

        // Atomic rename
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err).with_context(|| {
                format!(
                    "Failed to rename {} to {}",
                    temp_path.display(),
                    self.path.display()
                )
            });
        }

        debug!("Saved {} record(s) to {}", rows.len(), self.path.display());

        // Lock is released when `lock` is dropped
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Communication, CommunicationType, Customer, NewCommunication, NewCustomer, NewTask, Task,
        TaskStatus,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn at(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, sec)
            .unwrap()
    }

    fn make_customer(sec: u32, name: &str) -> Customer {
        Customer::new(
            NewCustomer {
                name: name.to_string(),
                email: format!("{}@example.com", sec),
                phone: "555".to_string(),
                company: "Acme, Inc.".to_string(),
                notes: "likes \"quotes\"\nand lines".to_string(),
            },
            at(sec),
        )
    }

    #[test]
    fn read_missing_table() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> = CsvTable::in_dir(dir.path());

        assert!(table.read_all().unwrap().is_empty());
    }

    #[test]
    fn ensure_writes_header_only_once() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Task> = CsvTable::in_dir(dir.path());

        assert!(table.ensure().unwrap());
        assert_eq!(
            fs::read_to_string(table.path()).unwrap(),
            "id,customer_id,title,description,due_date,status,created_date,assigned_to\n"
        );

        assert!(!table.ensure().unwrap());
        assert!(table.read_all().unwrap().is_empty());
    }

    #[test]
    fn write_and_read_customers() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> = CsvTable::in_dir(dir.path());

        let rows: Vec<Customer> = (0..5).map(|i| make_customer(i, &format!("C{}", i))).collect();
        table.write_all(&rows).unwrap();

        let loaded = table.read_all().unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn write_and_read_communications_and_tasks() {
        let dir = TempDir::new().unwrap();
        let customer = make_customer(0, "Acme");

        let comms = vec![Communication::new(
            NewCommunication {
                customer_id: customer.id.clone(),
                kind: CommunicationType::Meeting,
                subject: "Kickoff".to_string(),
                notes: "On site".to_string(),
                tags: "onsite,kickoff".to_string(),
            },
            at(1),
        )];
        let mut task = Task::new(
            NewTask {
                customer_id: customer.id.clone(),
                title: "Follow up".to_string(),
                description: String::new(),
                due_date: "next week".to_string(),
                assigned_to: "admin".to_string(),
            },
            at(2),
        );
        task.status = TaskStatus::Overdue;

        let comm_table: CsvTable<Communication> = CsvTable::in_dir(dir.path());
        let task_table: CsvTable<Task> = CsvTable::in_dir(dir.path());
        comm_table.write_all(&comms).unwrap();
        task_table.write_all(std::slice::from_ref(&task)).unwrap();

        assert_eq!(comm_table.read_all().unwrap(), comms);
        assert_eq!(task_table.read_all().unwrap(), vec![task]);
    }

    #[test]
    fn skips_bad_rows() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Task> = CsvTable::in_dir(dir.path());

        fs::write(
            table.path(),
            "id,customer_id,title,description,due_date,status,created_date,assigned_to\n\
             TASK_1,CUST_1,ok,,2025-01-01,pending,2025-01-01 00:00:00,admin\n\
             TASK_2,CUST_1,bad status,,2025-01-01,someday,2025-01-01 00:00:00,admin\n\
             TASK_3,CUST_1,short\n\
             \n\
             TASK_4,CUST_1,also ok,,,OVERDUE,2025-01-01 00:00:00,\n",
        )
        .unwrap();

        let loaded = table.read_all().unwrap();
        let ids: Vec<&str> = loaded.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["TASK_1", "TASK_4"]);
    }

    #[test]
    fn first_line_is_always_header() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> = CsvTable::in_dir(dir.path());

        fs::write(table.path(), "CUST_1,a,b,c,d,e,f\nCUST_2,a,b,c,d,e,f\n").unwrap();

        let loaded = table.read_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_str(), "CUST_2");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> =
            CsvTable::in_dir(&dir.path().join("nested").join("data"));

        table.write_all(&[make_customer(1, "A")]).unwrap();

        assert!(table.path().exists());
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> = CsvTable::in_dir(dir.path());

        table.write_all(&[make_customer(1, "A")]).unwrap();

        // Temp file should not exist after write
        let temp_path = table.path().with_extension("csv.tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn failed_rename_reports_error() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> = CsvTable::in_dir(dir.path());

        // A non-empty directory where the file should be blocks the rename
        fs::create_dir_all(table.path().join("blocker")).unwrap();

        let err = table.write_all(&[make_customer(1, "A")]).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to rename"));
        assert!(!table.path().with_extension("csv.tmp").exists());
    }

    #[test]
    fn stray_quote_only_drops_its_own_row() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> = CsvTable::in_dir(dir.path());

        fs::write(
            table.path(),
            "id,name,email,phone,company,notes,created_date\n\
             CUST_1,Alice,a@x.test,555,Acme,says \"hi,2025-01-01 00:00:00\n\
             CUST_2,Bob,b@x.test,556,Globex,,2025-01-01 00:00:01\n\
             CUST_3,Carol,c@x.test,557,Initech,,2025-01-01 00:00:02\n",
        )
        .unwrap();

        let loaded = table.read_all().unwrap();
        let names: Vec<&str> = loaded.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carol"]);

        // Saving what was loaded keeps the later rows on disk
        table.write_all(&loaded).unwrap();
        let on_disk = fs::read_to_string(table.path()).unwrap();
        assert!(on_disk.contains("Bob"));
        assert!(on_disk.contains("Carol"));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> = CsvTable::in_dir(dir.path());

        let mut bytes = b"id,name,email,phone,company,notes,created_date\nCUST_1,Ren".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b",r@x.test,555,Acme,,2025-01-01 00:00:00\n");
        bytes.extend_from_slice(b"CUST_2,Bob,b@x.test,556,Globex,,2025-01-01 00:00:01\n");
        fs::write(table.path(), bytes).unwrap();

        let loaded = table.read_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "Ren\u{FFFD}");
        assert_eq!(loaded[1].name, "Bob");
    }

    #[test]
    fn writers_wait_for_the_table_lock() {
        let dir = TempDir::new().unwrap();
        let table: CsvTable<Customer> = CsvTable::in_dir(dir.path());
        table.ensure().unwrap();

        let held = File::create(table.lock_path()).unwrap();
        held.lock_exclusive().unwrap();

        let path = table.path().to_path_buf();
        let writer = thread::spawn(move || {
            let table: CsvTable<Customer> = CsvTable::new(path);
            table.write_all(&[make_customer(1, "A")]).unwrap();
        });

        thread::sleep(Duration::from_millis(200));
        assert!(table.read_all().unwrap().is_empty());
        assert!(!table.path().with_extension("csv.tmp").exists());

        FileExt::unlock(&held).unwrap();
        writer.join().unwrap();

        assert_eq!(table.read_all().unwrap().len(), 1);
    }
}
