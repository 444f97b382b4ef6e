//! Fixed entity catalog: the eight portal tables, their columns, and the dataset shape exchanged over HTTP.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row as exchanged over HTTP: column name to scalar value, in column order.
pub type Record = Map<String, Value>;

/// SQL type of a catalog column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Varchar(u16),
    Text,
    Integer,
}

impl ColumnType {
    /// Type used in CREATE TABLE.
    pub fn ddl(&self) -> String {
        match self {
            ColumnType::Varchar(n) => format!("VARCHAR({})", n),
            ColumnType::Text => "TEXT".into(),
            ColumnType::Integer => "INTEGER".into(),
        }
    }

    /// Type used when casting a bound parameter (`$1::varchar`).
    pub fn cast(&self) -> &'static str {
        match self {
            ColumnType::Varchar(_) => "varchar",
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
}

const fn req(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty, nullable: false }
}

const fn opt(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty, nullable: true }
}

const ID: ColumnType = ColumnType::Varchar(50);
const NAME: ColumnType = ColumnType::Varchar(255);
const SHORT: ColumnType = ColumnType::Varchar(100);

/// Primary key column shared by every table.
pub const PRIMARY_KEY: &str = "id";

const SCHOOLS: &[Column] = &[
    req("id", ID),
    req("name", NAME),
    opt("address", ColumnType::Varchar(500)),
];

const USERS: &[Column] = &[
    req("id", ID),
    req("name", NAME),
    req("role", ColumnType::Varchar(50)),
    opt("login", SHORT),
    opt("password", SHORT),
    opt("school_id", ID),
];

const TEACHERS: &[Column] = &[
    req("id", ID),
    req("name", NAME),
    req("subject", SHORT),
    req("login", SHORT),
    req("password", SHORT),
    req("school_id", ID),
];

const CLASSES: &[Column] = &[
    req("id", ID),
    req("name", SHORT),
    req("grade", ColumnType::Integer),
    req("school_id", ID),
    opt("teacher_id", ID),
];

const STUDENTS: &[Column] = &[
    req("id", ID),
    req("name", NAME),
    req("class_id", ID),
    req("school_id", ID),
    opt("login", SHORT),
    opt("password", SHORT),
];

const GRADES: &[Column] = &[
    req("id", ID),
    req("student_id", ID),
    req("teacher_id", ID),
    req("subject", SHORT),
    req("grade", ColumnType::Integer),
    req("date", ColumnType::Varchar(50)),
    req("class_id", ID),
];

const POSTS: &[Column] = &[
    req("id", ID),
    req("title", NAME),
    req("content", ColumnType::Text),
    req("author_id", ID),
    req("author_name", NAME),
    req("school_id", ID),
    req("date", ColumnType::Varchar(50)),
];

const HOMEWORK: &[Column] = &[
    req("id", ID),
    req("title", NAME),
    req("description", ColumnType::Text),
    req("subject", SHORT),
    req("class_id", ID),
    req("teacher_id", ID),
    req("school_id", ID),
    req("due_date", ColumnType::Varchar(50)),
    req("created_date", ColumnType::Varchar(50)),
];

/// The eight portal tables. Only these names ever reach SQL as table identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Schools,
    Users,
    Teachers,
    Classes,
    Students,
    Grades,
    Posts,
    Homework,
}

impl Entity {
    /// Canonical order, used for schema creation and for the GET response.
    pub const ALL: [Entity; 8] = [
        Entity::Schools,
        Entity::Users,
        Entity::Teachers,
        Entity::Classes,
        Entity::Students,
        Entity::Grades,
        Entity::Posts,
        Entity::Homework,
    ];

    /// Table name and JSON key.
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Schools => "schools",
            Entity::Users => "users",
            Entity::Teachers => "teachers",
            Entity::Classes => "classes",
            Entity::Students => "students",
            Entity::Grades => "grades",
            Entity::Posts => "posts",
            Entity::Homework => "homework",
        }
    }

    pub fn from_name(name: &str) -> Option<Entity> {
        Entity::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Entity::Schools => SCHOOLS,
            Entity::Users => USERS,
            Entity::Teachers => TEACHERS,
            Entity::Classes => CLASSES,
            Entity::Students => STUDENTS,
            Entity::Grades => GRADES,
            Entity::Posts => POSTS,
            Entity::Homework => HOMEWORK,
        }
    }

    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns().iter().find(|c| c.name == name)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Full portal dataset. Serializes with all eight keys in canonical order; `Default` is the empty shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub schools: Vec<Record>,
    pub users: Vec<Record>,
    pub teachers: Vec<Record>,
    pub classes: Vec<Record>,
    pub students: Vec<Record>,
    pub grades: Vec<Record>,
    pub posts: Vec<Record>,
    pub homework: Vec<Record>,
}

impl Dataset {
    pub fn table(&self, entity: Entity) -> &Vec<Record> {
        match entity {
            Entity::Schools => &self.schools,
            Entity::Users => &self.users,
            Entity::Teachers => &self.teachers,
            Entity::Classes => &self.classes,
            Entity::Students => &self.students,
            Entity::Grades => &self.grades,
            Entity::Posts => &self.posts,
            Entity::Homework => &self.homework,
        }
    }

    pub fn table_mut(&mut self, entity: Entity) -> &mut Vec<Record> {
        match entity {
            Entity::Schools => &mut self.schools,
            Entity::Users => &mut self.users,
            Entity::Teachers => &mut self.teachers,
            Entity::Classes => &mut self.classes,
            Entity::Students => &mut self.students,
            Entity::Grades => &mut self.grades,
            Entity::Posts => &mut self.posts,
            Entity::Homework => &mut self.homework,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_the_allow_list() {
        for e in Entity::ALL {
            assert_eq!(Entity::from_name(e.name()), Some(e));
        }
        assert_eq!(Entity::from_name("not_a_table"), None);
        assert_eq!(Entity::from_name("Schools"), None);
        assert_eq!(Entity::from_name("schools; DROP TABLE users"), None);
    }

    #[test]
    fn every_table_is_keyed_by_id() {
        for e in Entity::ALL {
            let first = e.columns()[0];
            assert_eq!(first.name, PRIMARY_KEY);
            assert!(!first.nullable);
        }
    }

    #[test]
    fn optional_columns_match_catalog() {
        let nullable: Vec<&str> = Entity::Users
            .columns()
            .iter()
            .filter(|c| c.nullable)
            .map(|c| c.name)
            .collect();
        assert_eq!(nullable, ["login", "password", "school_id"]);
        assert!(Entity::Teachers.columns().iter().all(|c| !c.nullable));
        assert_eq!(Entity::Grades.column("grade").map(|c| c.ty), Some(ColumnType::Integer));
        assert!(Entity::Grades.column("address").is_none());
    }

    #[test]
    fn empty_dataset_has_all_keys_in_order() {
        let json = serde_json::to_value(Dataset::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let expected: Vec<&str> = Entity::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(keys, expected);
        assert!(json.as_object().unwrap().values().all(|v| v == &Value::Array(vec![])));
    }
}
