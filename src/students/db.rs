//! SQLite backed lesson store
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use tokio_rusqlite::Connection;

use super::{LessonStore, StudentDisplay, StudentLessons, Tutor};

type LessonRow = (i64, StudentDisplay, Option<DateTime<Utc>>);

/// Lessons are stored as RFC 3339 UTC text so they sort lexically.
fn to_sql_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn from_sql_instant(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn read_lesson_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LessonRow> {
    let lesson: Option<String> = row.get(6)?;
    let lesson = lesson.map(|l| from_sql_instant(6, &l)).transpose()?;
    Ok((
        row.get(0)?,
        StudentDisplay {
            name: row.get(1)?,
            slug: row.get(2)?,
            test_label: row.get(3)?,
            location_summary: row.get(4)?,
            photo_ref: row.get(5)?,
        },
        lesson,
    ))
}

/// Fold joined rows (ordered by student) into one record per student.
/// Students without lessons come through with an empty list.
fn group_by_student(rows: Vec<LessonRow>) -> Vec<StudentLessons> {
    let mut students: Vec<StudentLessons> = Vec::new();
    for (student_id, display, lesson) in rows {
        match students.last_mut() {
            Some(current) if current.student_id == student_id => current.lessons.extend(lesson),
            _ => students.push(StudentLessons {
                student_id,
                display,
                lessons: lesson.into_iter().collect(),
            }),
        }
    }
    students
}

const SELECT_STUDENT_LESSONS: &str = r"
    SELECT
      s.id,
      s.name,
      s.slug,
      s.curr_test,
      s.address,
      s.photo,
      l.lesson
    FROM student s
    LEFT JOIN lesson l ON l.student_id = s.id
";

/// A student record to insert.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub slug: String,
    pub tutor_id: Option<i64>,
    pub test_label: Option<String>,
    pub address: Option<String>,
    pub photo_ref: Option<String>,
}

#[derive(Clone)]
pub struct SqliteLessonStore {
    db: Connection,
}

impl SqliteLessonStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }

    pub async fn insert_tutor(&self, name: &str, email: &str, admin: bool) -> Result<i64> {
        let name = name.to_owned();
        let email = email.to_owned();
        let id = self
            .db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO tutor (name, email, admin) VALUES (?, ?, ?)",
                    tokio_rusqlite::params![name, email, admin],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    pub async fn insert_student(&self, student: NewStudent) -> Result<i64> {
        let id = self
            .db
            .call(move |conn| {
                conn.execute(
                    r"
                    INSERT INTO student (name, slug, tutor_id, curr_test, address, photo)
                    VALUES (?, ?, ?, ?, ?, ?)
                    ",
                    tokio_rusqlite::params![
                        student.name,
                        student.slug,
                        student.tutor_id,
                        student.test_label,
                        student.address,
                        student.photo_ref,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }
}

#[async_trait]
impl LessonStore for SqliteLessonStore {
    async fn fetch_lessons_by_tutor(&self, tutor_id: i64) -> Result<Vec<StudentLessons>> {
        let rows = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE s.tutor_id = ? ORDER BY s.id, l.lesson",
                    SELECT_STUDENT_LESSONS
                ))?;
                let rows = stmt
                    .query_map([tutor_id], read_lesson_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        Ok(group_by_student(rows))
    }

    async fn fetch_student_lessons(&self, student_id: i64) -> Result<Option<StudentLessons>> {
        let rows = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE s.id = ? ORDER BY l.lesson",
                    SELECT_STUDENT_LESSONS
                ))?;
                let rows = stmt
                    .query_map([student_id], read_lesson_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        Ok(group_by_student(rows).into_iter().next())
    }

    async fn replace_lessons(&self, student_id: i64, lessons: Vec<DateTime<Utc>>) -> Result<bool> {
        let stored: Vec<String> = lessons.iter().map(to_sql_instant).collect();

        let replaced = self
            .db
            .call(move |conn| {
                // Delete and insert together or not at all
                let tx = conn.transaction()?;

                let exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM student WHERE id = ?)",
                    [student_id],
                    |row| row.get(0),
                )?;
                if !exists {
                    return Ok(false);
                }

                tx.execute("DELETE FROM lesson WHERE student_id = ?", [student_id])?;
                {
                    let mut stmt =
                        tx.prepare("INSERT INTO lesson (student_id, lesson) VALUES (?, ?)")?;
                    for lesson in &stored {
                        stmt.execute(tokio_rusqlite::params![student_id, lesson])?;
                    }
                }

                tx.commit()?;
                Ok(true)
            })
            .await?;

        Ok(replaced)
    }

    async fn list_tutors(&self) -> Result<Vec<Tutor>> {
        let tutors = self
            .db
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT id, name, email, admin FROM tutor ORDER BY name ASC")?;
                let rows = stmt
                    .query_map([], |i| {
                        Ok(Tutor {
                            id: i.get(0)?,
                            name: i.get(1)?,
                            email: i.get(2)?,
                            admin: i.get(3)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        Ok(tutors)
    }
}
