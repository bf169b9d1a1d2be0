use crate::{
    ColumnMapper, Descriptor, Error, Instance, Mapper, MapperTree, PrimaryKey, Relation, Result,
    Row, RowMapper, Value,
};
use log::trace;
use std::{collections::HashMap, slice};

/// Per-call identity map: (table-mapper scope, primary key) to the instance
/// materialized for that key. Created empty for each pass and discarded with
/// it, never shared across calls.
type IdentityMap = HashMap<(usize, PrimaryKey), Instance>;

/// Result of decoding one level of one row.
struct Decoded {
    instance: Instance,
    /// First time this primary key was seen in the pass. Repeat occurrences
    /// (join fan-out) reuse the instance with `fresh` unset so to-many
    /// collections are not double-appended.
    fresh: bool,
}

/// Rebuilds the distinct, relationship-wired root instances from a flat,
/// denormalized result set.
///
/// Every row must be the pre-order flattening of `tree`: the root's primary
/// key first, then its remaining columns and nested mappers in declaration
/// order, recursively. Roots are returned in first-occurrence order of their
/// primary key; rows repeated by join fan-out collapse into one instance but
/// still contribute to-many children discovered at deeper levels.
///
/// A row whose width does not match the tree, or a mapper naming a property
/// its descriptor does not know, aborts the call with no partial result.
pub fn materialize<R>(rows: R, tree: &MapperTree) -> Result<Vec<Instance>>
where
    R: IntoIterator<Item = Row>,
{
    let mut identity = IdentityMap::new();
    let mut roots = Vec::new();
    let mut count = 0usize;
    for (index, row) in rows.into_iter().enumerate() {
        if row.len() != tree.width() {
            return Err(Error::msg(format!(
                "Row {} carries {} columns, the mapper tree declares {}",
                index,
                row.len(),
                tree.width(),
            )));
        }
        let mut cells = row.iter();
        if let Some(Decoded {
            instance,
            fresh: true,
        }) = decode_level(&mut cells, tree.root(), &mut identity)?
        {
            roots.push(instance);
        }
        count += 1;
    }
    trace!(
        "Materialized {} root instances out of {} rows",
        roots.len(),
        count
    );
    Ok(roots)
}

/// Decodes one level of one row: the level's primary-key cell first, then
/// every remaining mapper in order, with the cell cursor and the mapper list
/// advancing in lockstep.
fn decode_level(
    cells: &mut slice::Iter<'_, Value>,
    mapper: &RowMapper,
    identity: &mut IdentityMap,
) -> Result<Option<Decoded>> {
    // An empty mapper spans zero cells and never yields an instance.
    let Some((first, rest)) = mapper.mappers().split_first() else {
        return Ok(None);
    };
    let Mapper::Column(..) = first else {
        return Err(Error::msg(format!(
            "Mapper for table {} must start with its primary-key column",
            mapper.descriptor().table(),
        )));
    };
    let key_cell = next_cell(cells, mapper)?;
    if key_cell.is_null() {
        // Outer-join miss: no instance at this level, but the row still
        // carries the level's full declared span. Consume it so sibling and
        // ancestor levels stay aligned.
        skip_level(cells, mapper, rest)?;
        return Ok(None);
    }
    let descriptor = mapper.descriptor();
    let key = (mapper.scope(), PrimaryKey::try_from(key_cell)?);
    let (instance, fresh) = match identity.get(&key) {
        Some(instance) => (instance.clone(), false),
        None => {
            let instance = descriptor.new_instance()?;
            descriptor.set_value(&instance, descriptor.primary_key(), key_cell.clone())?;
            identity.insert(key, instance.clone());
            (instance, true)
        }
    };
    for child in rest {
        match child {
            Mapper::Column(column) => {
                let cell = next_cell(cells, mapper)?;
                apply_column(descriptor.as_ref(), &instance, column, cell)?;
            }
            Mapper::Row(nested) => {
                let decoded = decode_level(cells, nested, identity)?;
                if nested.to_many() {
                    // Only a first-seen child extends the collection; a null
                    // row or a fan-out repeat leaves it untouched.
                    if let Some(Decoded {
                        instance: child_instance,
                        fresh: true,
                    }) = decoded
                    {
                        descriptor.append_child(&instance, nested.property(), child_instance)?;
                    }
                } else {
                    apply_relation(descriptor.as_ref(), &instance, nested.property(), decoded)?;
                }
            }
        }
    }
    Ok(Some(Decoded { instance, fresh }))
}

/// Applies one column cell to the level's instance.
///
/// A plain column assigns the raw value. A bare foreign-key column yields a
/// stub instance carrying only the related primary key, or marks the relation
/// absent on null; it never downgrades a relation a join already loaded, and
/// it is suppressed entirely when a nested mapper populates the relation.
fn apply_column(
    descriptor: &dyn Descriptor,
    instance: &Instance,
    column: &ColumnMapper,
    cell: &Value,
) -> Result<()> {
    let Some(foreign_key) = &column.foreign_key else {
        return descriptor.set_value(instance, column.property, cell.clone());
    };
    if foreign_key.joined {
        return Ok(());
    }
    match descriptor.relation(instance, column.property)? {
        Relation::Loaded(..) | Relation::Stub(..) => {}
        Relation::NotLoaded if cell.is_null() => {
            descriptor.set_relation(instance, column.property, Relation::Absent)?;
        }
        Relation::NotLoaded | Relation::Absent => {
            if !cell.is_null() {
                let target = &foreign_key.target;
                let stub = target.new_instance()?;
                target.set_value(&stub, target.primary_key(), cell.clone())?;
                descriptor.set_relation(instance, column.property, Relation::Stub(stub))?;
            }
        }
    }
    Ok(())
}

/// Applies a nested to-one / belongs-to decode result to the parent.
///
/// An already loaded relation is never overwritten; a stub is superseded by
/// the fully joined instance; a missing joined row marks the relation absent
/// only if nothing decided it yet.
fn apply_relation(
    descriptor: &dyn Descriptor,
    instance: &Instance,
    property: &'static str,
    decoded: Option<Decoded>,
) -> Result<()> {
    match (descriptor.relation(instance, property)?, decoded) {
        (Relation::Loaded(..), _) => {}
        (_, Some(decoded)) => {
            descriptor.set_relation(instance, property, Relation::Loaded(decoded.instance))?;
        }
        (Relation::NotLoaded, None) => {
            descriptor.set_relation(instance, property, Relation::Absent)?;
        }
        (Relation::Absent | Relation::Stub(..), None) => {}
    }
    Ok(())
}

/// Skip mode: advances the cell cursor past every remaining mapper of a level
/// whose primary key was null, creating nothing.
fn skip_level(
    cells: &mut slice::Iter<'_, Value>,
    level: &RowMapper,
    mappers: &[Mapper],
) -> Result<()> {
    for mapper in mappers {
        match mapper {
            Mapper::Column(..) => {
                next_cell(cells, level)?;
            }
            Mapper::Row(nested) => skip_level(cells, nested, nested.mappers())?,
        }
    }
    Ok(())
}

fn next_cell<'a>(cells: &mut slice::Iter<'a, Value>, level: &RowMapper) -> Result<&'a Value> {
    cells.next().ok_or_else(|| {
        Error::msg(format!(
            "Row ended before the columns of table {} were read",
            level.descriptor().table(),
        ))
    })
}
