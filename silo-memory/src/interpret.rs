use crate::{Database, MemTable};
use anyhow::anyhow;
use silo_core::{
    DeleteSpec, EntityDescriptor, Error, InsertSpec, QueryResult, QuerySpec, Record, Result, Row,
    RowLabeled, RowNames, RowsAffected, Statement, UpdateSpec, Value,
};
use std::{cmp::Ordering, collections::HashMap};

/// Interpret one planned statement against the shared storage.
pub(crate) fn run(database: &Database, statement: Statement) -> Vec<Result<QueryResult>> {
    let mut tables = database.lock().unwrap_or_else(|e| e.into_inner());
    match statement {
        Statement::Select(spec) => match select(&tables, &spec) {
            Ok(rows) => rows.into_iter().map(|row| Ok(row.into())).collect(),
            Err(e) => vec![Err(e)],
        },
        Statement::Count(spec) => vec![count(&tables, &spec).map(|count| {
            scalar_row("count", Value::Int64(Some(count as i64))).into()
        })],
        Statement::Exists(spec) => vec![count(&tables, &spec).map(|count| {
            scalar_row("exists", Value::Boolean(Some(count > 0))).into()
        })],
        Statement::Insert(insert) => vec![insert_rows(&mut tables, &insert).map(Into::into)],
        Statement::Update(update) => vec![update_rows(&mut tables, &update).map(Into::into)],
        Statement::Delete(delete) => vec![delete_rows(&mut tables, &delete).map(Into::into)],
        Statement::CreateTable {
            descriptor,
            if_not_exists,
        } => vec![create_table(&mut tables, descriptor, if_not_exists).map(Into::into)],
        Statement::DropTable {
            descriptor,
            if_exists,
        } => vec![drop_table(&mut tables, descriptor, if_exists).map(Into::into)],
    }
}

fn scalar_row(label: &str, value: Value) -> RowLabeled {
    RowLabeled::new(
        [label.to_string()].into_iter().collect::<RowNames>(),
        vec![value].into_boxed_slice(),
    )
}

fn table<'t>(
    tables: &'t HashMap<String, MemTable>,
    descriptor: &EntityDescriptor,
) -> Result<&'t MemTable> {
    let name = descriptor.table().qualified_name();
    tables
        .get(&name)
        .ok_or_else(|| Error::execution(anyhow!("table `{}` does not exist", name)))
}

fn table_mut<'t>(
    tables: &'t mut HashMap<String, MemTable>,
    descriptor: &EntityDescriptor,
) -> Result<&'t mut MemTable> {
    let name = descriptor.table().qualified_name();
    tables
        .get_mut(&name)
        .ok_or_else(|| Error::execution(anyhow!("table `{}` does not exist", name)))
}

/// Sort comparison with NULLs last, mirroring the rendered ORDER BY.
fn compare_for_sort(lhs: Option<&Value>, rhs: Option<&Value>) -> Ordering {
    let null = |v: Option<&Value>| v.is_none_or(Value::is_null);
    match (null(lhs), null(rhs)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => lhs
            .zip(rhs)
            .and_then(|(l, r)| l.compare(r))
            .unwrap_or(Ordering::Equal),
    }
}

fn select(tables: &HashMap<String, MemTable>, spec: &QuerySpec) -> Result<Vec<RowLabeled>> {
    let table = table(tables, spec.descriptor)?;
    let mut rows: Vec<RowLabeled> = table
        .rows
        .iter()
        .map(|values| RowLabeled::new(table.labels.clone(), values.clone()))
        .filter(|row| spec.cond.matches(row))
        .collect();
    // Stable sorts applied in reverse key order produce the multi-key order.
    for key in spec.order.iter().rev() {
        rows.sort_by(|a, b| {
            let ordering =
                compare_for_sort(a.get_column(key.column.name), b.get_column(key.column.name));
            match key.direction {
                silo_core::Direction::Asc => ordering,
                silo_core::Direction::Desc => ordering.reverse(),
            }
        });
    }
    let offset = spec.offset.unwrap_or(0) as usize;
    let rows = rows.into_iter().skip(offset);
    let rows: Vec<RowLabeled> = match spec.limit {
        Some(limit) => rows.take(limit as usize).collect(),
        None => rows.collect(),
    };
    if spec.projection.is_empty() {
        return Ok(rows);
    }
    let labels: RowNames = spec
        .projection
        .iter()
        .map(|c| c.name.to_string())
        .collect();
    Ok(rows
        .into_iter()
        .map(|row| {
            let values: Row = spec
                .projection
                .iter()
                .map(|c| row.get_column(c.name).cloned().unwrap_or(Value::Null))
                .collect();
            RowLabeled::new(labels.clone(), values)
        })
        .collect())
}

fn count(tables: &HashMap<String, MemTable>, spec: &QuerySpec) -> Result<u64> {
    let table = table(tables, spec.descriptor)?;
    Ok(table
        .rows
        .iter()
        .filter(|values| {
            spec.cond
                .matches(&RowLabeled::new(table.labels.clone(), (*values).clone()))
        })
        .count() as u64)
}

fn row_from_record(labels: &RowNames, record: &Record) -> Result<Row> {
    for (name, _) in record {
        if !labels.iter().any(|l| l == name) {
            return Err(Error::execution(anyhow!("unknown column `{}`", name)));
        }
    }
    Ok(labels
        .iter()
        .map(|label| {
            record
                .iter()
                .find(|(name, _)| name == label)
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Null)
        })
        .collect())
}

fn insert_rows(
    tables: &mut HashMap<String, MemTable>,
    insert: &InsertSpec,
) -> Result<RowsAffected> {
    let table = table_mut(tables, insert.descriptor)?;
    let mut affected = RowsAffected::default();
    for record in &insert.rows {
        let row = row_from_record(&table.labels, record)?;
        table.rows.push(row);
        affected.rows_affected += 1;
    }
    Ok(affected)
}

fn update_rows(
    tables: &mut HashMap<String, MemTable>,
    update: &UpdateSpec,
) -> Result<RowsAffected> {
    let table = table_mut(tables, update.descriptor)?;
    let mut positions = Vec::with_capacity(update.assignments.len());
    for (name, value) in &update.assignments {
        let Some(position) = table.labels.iter().position(|l| l == name) else {
            return Err(Error::execution(anyhow!("unknown column `{}`", name)));
        };
        positions.push((position, value.clone()));
    }
    let labels = table.labels.clone();
    let mut affected = RowsAffected::default();
    for row in &mut table.rows {
        if !update
            .cond
            .matches(&RowLabeled::new(labels.clone(), row.clone()))
        {
            continue;
        }
        for (position, value) in &positions {
            row[*position] = value.clone();
        }
        affected.rows_affected += 1;
    }
    Ok(affected)
}

fn delete_rows(
    tables: &mut HashMap<String, MemTable>,
    delete: &DeleteSpec,
) -> Result<RowsAffected> {
    let table = table_mut(tables, delete.descriptor)?;
    let labels = table.labels.clone();
    let before = table.rows.len();
    table
        .rows
        .retain(|row| !delete.cond.matches(&RowLabeled::new(labels.clone(), row.clone())));
    Ok(RowsAffected {
        rows_affected: (before - table.rows.len()) as u64,
        last_affected_id: None,
    })
}

fn create_table(
    tables: &mut HashMap<String, MemTable>,
    descriptor: &EntityDescriptor,
    if_not_exists: bool,
) -> Result<RowsAffected> {
    let name = descriptor.table().qualified_name();
    if tables.contains_key(&name) {
        if if_not_exists {
            return Ok(RowsAffected::default());
        }
        return Err(Error::execution(anyhow!("table `{}` already exists", name)));
    }
    let labels: RowNames = descriptor
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    tables.insert(
        name,
        MemTable {
            labels,
            rows: Vec::new(),
        },
    );
    Ok(RowsAffected::default())
}

fn drop_table(
    tables: &mut HashMap<String, MemTable>,
    descriptor: &EntityDescriptor,
    if_exists: bool,
) -> Result<RowsAffected> {
    let name = descriptor.table().qualified_name();
    if tables.remove(&name).is_none() && !if_exists {
        return Err(Error::execution(anyhow!("table `{}` does not exist", name)));
    }
    Ok(RowsAffected::default())
}
