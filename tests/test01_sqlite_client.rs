#![cfg(feature = "sqlite")]

use chrono::{DateTime, TimeZone, Utc};
use sql_template::prelude::*;

const CREATE_SHAPES: &str = "CREATE TABLE shapes (
    name TEXT NOT NULL,
    sides INTEGER,
    regular BOOLEAN,
    area REAL,
    drawn_at TEXT
)";

const INSERT_SHAPE: &str = "INSERT INTO shapes (name, sides, regular, area) \
                            VALUES (:name, :sides, :regular, :area)";

fn shapes_client() -> Result<DatabaseClient<SqliteDriver>, SqlTemplateError> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut client = DatabaseClient::sqlite_builder(":memory:").build()?;
    client.execute(&Statement::new(CREATE_SHAPES))?;
    Ok(client)
}

fn insert_shape(
    client: &mut DatabaseClient<SqliteDriver>,
    name: &str,
    sides: i64,
    regular: bool,
    area: f64,
) -> Result<(), SqlTemplateError> {
    client.execute(
        &Statement::new(INSERT_SHAPE)
            .bind("name", name)
            .bind("sides", sides)
            .bind("regular", regular)
            .bind("area", area),
    )
}

fn count_shapes(client: &mut DatabaseClient<SqliteDriver>) -> Result<i64, SqlTemplateError> {
    let mut cursor = client.execute_statement(&Statement::new("SELECT COUNT(*) AS cnt FROM shapes"))?;
    let row = cursor
        .next_row()?
        .ok_or_else(|| SqlTemplateError::ConfigError("missing count".into()))?;
    row.get_as::<i64>("cnt")
}

#[test]
fn insert_then_select_rows() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;
    insert_shape(&mut client, "triangle", 3, true, 0.433)?;
    insert_shape(&mut client, "square", 4, true, 1.0)?;
    insert_shape(&mut client, "kite", 4, false, 0.75)?;

    let stmt = Statement::new(
        "SELECT name, sides, regular, area FROM shapes WHERE sides >= :min_sides ORDER BY name",
    )
    .bind("min_sides", 4);
    let mut cursor = client.execute_statement(&stmt)?;
    assert_eq!(cursor.column_names(), ["name", "sides", "regular", "area"]);

    let kite = cursor.next_row()?.expect("kite row");
    assert_eq!(kite.get_as::<String>("name")?, "kite");
    assert!(!kite.get_as::<bool>("regular")?);
    assert_eq!(kite.get_as::<f64>("area")?, 0.75);

    let square = cursor.next_row()?.expect("square row");
    assert_eq!(square.get("sides")?, &SqlValue::Int(4));

    assert!(cursor.next_row()?.is_none());
    assert!(cursor.is_closed());
    Ok(())
}

#[test]
fn cursor_works_as_iterator() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;
    for sides in 3..8 {
        insert_shape(&mut client, "polygon", sides, true, 1.0)?;
    }

    let sides: Vec<i64> = client
        .execute_statement(&Statement::new("SELECT sides FROM shapes ORDER BY sides"))?
        .map(|row| row.and_then(|r| r.get_as::<i64>("sides")))
        .collect::<Result<_, _>>()?;
    assert_eq!(sides, vec![3, 4, 5, 6, 7]);
    Ok(())
}

#[test]
fn statements_without_results_return_empty_cursor() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;
    let mut cursor = client.execute_statement(
        &Statement::new(INSERT_SHAPE)
            .bind("name", "hexagon")
            .bind("sides", 6)
            .bind("regular", true)
            .bind("area", 2.598),
    )?;
    assert!(cursor.is_closed());
    assert!(cursor.column_names().is_empty());
    assert!(cursor.next_row()?.is_none());
    cursor.close();
    drop(cursor);

    assert_eq!(count_shapes(&mut client)?, 1);
    Ok(())
}

#[test]
fn empty_result_set_returns_none_first() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;
    let mut cursor = client
        .execute_statement(&Statement::new("SELECT name FROM shapes WHERE sides = :sides").bind("sides", 12))?;
    assert_eq!(cursor.column_names(), ["name"]);
    assert!(cursor.next_row()?.is_none());
    cursor.close();
    cursor.close();
    Ok(())
}

#[test]
fn unknown_column_lists_available_columns() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;
    insert_shape(&mut client, "square", 4, true, 1.0)?;

    let mut cursor = client.execute_statement(&Statement::new("SELECT name, sides FROM shapes"))?;
    let row = cursor.next_row()?.expect("one row");
    let err = row.get("colour").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Column \"colour\" not found. Available columns are: \"name\", \"sides\""
    );
    Ok(())
}

#[test]
fn binding_errors_never_reach_the_database() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;

    let unused = Statement::new(INSERT_SHAPE)
        .bind("name", "square")
        .bind("sides", 4)
        .bind("regular", true)
        .bind("area", 1.0)
        .bind("colour", "red");
    match client.execute(&unused) {
        Err(SqlTemplateError::UnusedVariables(names)) => assert_eq!(names, vec!["colour"]),
        other => panic!("expected UnusedVariables, got {other:?}"),
    }

    let unresolved = Statement::new(INSERT_SHAPE)
        .bind("name", "square")
        .bind("sides", 4)
        .bind("area", 1.0);
    assert!(matches!(
        client.execute(&unresolved),
        Err(SqlTemplateError::UnresolvedVariable { name, .. }) if name == "regular"
    ));

    let reserved = Statement::new("SELECT name FROM shapes WHERE name = '?'");
    assert!(matches!(
        client.execute(&reserved),
        Err(SqlTemplateError::InvalidTemplate(_))
    ));

    assert_eq!(count_shapes(&mut client)?, 0);
    Ok(())
}

#[test]
fn driver_failures_are_wrapped() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;
    let err = client
        .execute_statement(&Statement::new("SELECT * FROM circles"))
        .unwrap_err();
    match &err {
        SqlTemplateError::ExecutionError(DriverError::Sqlite(_)) => {}
        other => panic!("expected a wrapped sqlite error, got {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());
    Ok(())
}

#[test]
fn rows_are_read_one_step_at_a_time() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;
    client.execute(&Statement::new("CREATE TABLE readings (x INTEGER)"))?;
    for x in [1, i64::MIN] {
        client.execute(&Statement::new("INSERT INTO readings (x) VALUES (:x)").bind("x", x))?;
    }

    let mut cursor =
        client.execute_statement(&Statement::new("SELECT abs(x) AS v FROM readings ORDER BY rowid"))?;
    let first = cursor.next_row()?.expect("first reading");
    assert_eq!(first.get_as::<i64>("v")?, 1);

    let err = cursor.next_row().unwrap_err();
    assert!(matches!(
        err,
        SqlTemplateError::ExecutionError(DriverError::Sqlite(_))
    ));
    assert!(cursor.is_closed());
    assert!(cursor.next_row()?.is_none());
    Ok(())
}

#[test]
fn timestamps_and_nulls_round_trip() -> Result<(), SqlTemplateError> {
    let mut client = shapes_client()?;
    let drawn_at = Utc.with_ymd_and_hms(2017, 11, 5, 8, 30, 0).unwrap();
    client.execute(
        &Statement::new(
            "INSERT INTO shapes (name, sides, regular, area, drawn_at) \
             VALUES (:name, :sides, :regular, :area, :drawn_at)",
        )
        .bind("name", "circle")
        .bind("sides", None::<i64>)
        .bind("regular", true)
        .bind("area", std::f64::consts::PI)
        .bind("drawn_at", drawn_at),
    )?;

    let mut cursor = client.execute_statement(&Statement::new(
        "SELECT sides, drawn_at FROM shapes WHERE name = 'circle'",
    ))?;
    let row = cursor.next_row()?.expect("circle row");
    assert_eq!(row.get_as::<Option<i64>>("sides")?, None);
    assert_eq!(row.get_as::<DateTime<Utc>>("drawn_at")?, drawn_at);
    Ok(())
}

#[test]
fn file_backed_database_persists_between_clients() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("shapes.db");
    let path = path.to_string_lossy().into_owned();

    {
        let mut client = DatabaseClient::sqlite_builder(path.clone()).wal(true).build()?;
        client.execute(&Statement::new(CREATE_SHAPES))?;
        insert_shape(&mut client, "pentagon", 5, true, 1.72)?;
        client.close()?;
    }

    let mut client = DatabaseClient::open_sqlite(&SqliteOptions::new(path), ClientOptions::default())?;
    assert_eq!(count_shapes(&mut client)?, 1);
    Ok(())
}

#[test]
fn statements_outside_a_transaction_autocommit() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("autocommit.db").to_string_lossy().into_owned();

    let mut writer = DatabaseClient::sqlite_builder(path.clone()).build()?;
    writer.execute(&Statement::new(CREATE_SHAPES))?;
    insert_shape(&mut writer, "octagon", 8, true, 4.83)?;

    let mut reader = DatabaseClient::sqlite_builder(path).build()?;
    assert_eq!(count_shapes(&mut reader)?, 1);
    writer.close()?;
    Ok(())
}

#[test]
fn empty_path_is_a_config_error() {
    let err = DatabaseClient::open_sqlite(&SqliteOptions::new(""), ClientOptions::default())
        .err()
        .expect("empty path must fail");
    assert!(matches!(err, SqlTemplateError::ConfigError(_)));
}
