use std::fmt;

/// Rooms seeded into `comodos` by the insert tool, in insertion order.
pub const DEFAULT_ROOMS: [&str; 5] = [
    "Sala de Estar",
    "Cozinha",
    "Quarto",
    "Banheiro",
    "Escritório",
];

/// Sensor reading tables cleared by the clear tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorTable {
    Temperatura,
    Iluminacao,
    Consumo,
    Custo,
}

impl SensorTable {
    /// All sensor tables in the order they are cleared.
    pub const ALL: [SensorTable; 4] = [
        SensorTable::Temperatura,
        SensorTable::Iluminacao,
        SensorTable::Consumo,
        SensorTable::Custo,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            SensorTable::Temperatura => "temperatura",
            SensorTable::Iluminacao => "iluminacao",
            SensorTable::Consumo => "consumo",
            SensorTable::Custo => "custo",
        }
    }

    pub fn delete_all_sql(&self) -> String {
        format!("DELETE FROM {}", self.table_name())
    }
}

impl fmt::Display for SensorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Row of the `comodos` lookup table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Room {
    #[sqlx(rename = "comodos")]
    pub name: String,
}

impl Room {
    pub const TABLE: &'static str = "comodos";

    pub fn insert_sql() -> String {
        format!("INSERT INTO {} (comodos) VALUES (?)", Self::TABLE)
    }
}
