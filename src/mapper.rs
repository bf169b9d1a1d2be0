use crate::DescriptorRef;

/// One scalar or foreign-key column in the flattened SELECT list.
pub struct ColumnMapper {
    /// Target property on the level's entity. For a foreign-key column this
    /// is the relation property the stub (or nothing) is applied to.
    pub property: &'static str,
    /// Present when the column is a bare belongs-to foreign key.
    pub foreign_key: Option<ForeignKey>,
}

/// Foreign-key details of a [`ColumnMapper`].
pub struct ForeignKey {
    /// Descriptor of the referenced table, used to build stub instances.
    pub target: DescriptorRef,
    /// The relation is fully populated by a nested row mapper declared later
    /// at the same level; suppresses stub creation for this column.
    pub joined: bool,
}

/// A node of the mapper tree.
pub enum Mapper {
    Column(ColumnMapper),
    Row(RowMapper),
}

/// Mapper subtree for one joined table: the level's descriptor, the property
/// joining it to its parent, and the ordered child mappers whose pre-order
/// flattening is the level's column span.
///
/// The first child is always the primary-key column ([`RowMapper::new`] seeds
/// it); a mapper may also be empty ([`RowMapper::empty`]) when the join
/// contributes no columns at all.
pub struct RowMapper {
    descriptor: DescriptorRef,
    property: &'static str,
    to_many: bool,
    mappers: Vec<Mapper>,
    scope: usize,
}

impl RowMapper {
    /// A mapper for `descriptor`'s table, seeded with its primary-key column.
    pub fn new(descriptor: DescriptorRef) -> Self {
        let primary_key = descriptor.primary_key();
        Self {
            descriptor,
            property: "",
            to_many: false,
            mappers: vec![Mapper::Column(ColumnMapper {
                property: primary_key,
                foreign_key: None,
            })],
            scope: 0,
        }
    }

    /// A mapper whose table contributes zero columns (join present, nothing
    /// selected). Decoding it never creates an instance.
    pub fn empty(descriptor: DescriptorRef) -> Self {
        Self {
            descriptor,
            property: "",
            to_many: false,
            mappers: Vec::new(),
            scope: 0,
        }
    }

    /// Appends a plain scalar column.
    pub fn column(mut self, property: &'static str) -> Self {
        self.mappers.push(Mapper::Column(ColumnMapper {
            property,
            foreign_key: None,
        }));
        self
    }

    /// Appends a belongs-to foreign-key column: a non-null cell yields a stub
    /// instance on `property`, a null cell marks the relation absent.
    pub fn foreign_key(self, property: &'static str, target: DescriptorRef) -> Self {
        self.foreign_key_column(property, target, false)
    }

    /// Appends a foreign-key column whose relation a nested row mapper later
    /// at this level populates in full; the cell is consumed but no stub is
    /// created. The nested mapper must be declared after this column.
    pub fn foreign_key_joined(self, property: &'static str, target: DescriptorRef) -> Self {
        self.foreign_key_column(property, target, true)
    }

    fn foreign_key_column(
        mut self,
        property: &'static str,
        target: DescriptorRef,
        joined: bool,
    ) -> Self {
        self.mappers.push(Mapper::Column(ColumnMapper {
            property,
            foreign_key: Some(ForeignKey { target, joined }),
        }));
        self
    }

    /// Attaches a nested to-one / belongs-to join on `property`.
    pub fn one(mut self, property: &'static str, mut nested: RowMapper) -> Self {
        nested.property = property;
        nested.to_many = false;
        self.mappers.push(Mapper::Row(nested));
        self
    }

    /// Attaches a nested to-many join on `property`.
    pub fn many(mut self, property: &'static str, mut nested: RowMapper) -> Self {
        nested.property = property;
        nested.to_many = true;
        self.mappers.push(Mapper::Row(nested));
        self
    }

    pub fn descriptor(&self) -> &DescriptorRef {
        &self.descriptor
    }

    /// Property on the parent entity this subtree joins through.
    pub fn property(&self) -> &'static str {
        self.property
    }

    pub fn to_many(&self) -> bool {
        self.to_many
    }

    pub fn mappers(&self) -> &[Mapper] {
        &self.mappers
    }

    /// Identity-map scope of this table mapper, distinct per node so the same
    /// table joined twice deduplicates independently.
    pub(crate) fn scope(&self) -> usize {
        self.scope
    }

    /// Number of row cells this subtree consumes.
    pub fn width(&self) -> usize {
        self.mappers
            .iter()
            .map(|mapper| match mapper {
                Mapper::Column(..) => 1,
                Mapper::Row(nested) => nested.width(),
            })
            .sum()
    }

    fn number_scopes(&mut self, next: &mut usize) {
        self.scope = *next;
        *next += 1;
        for mapper in &mut self.mappers {
            if let Mapper::Row(nested) = mapper {
                nested.number_scopes(next);
            }
        }
    }
}

/// The immutable mapper tree for one query: the pre-order flattening of its
/// column mappers is the exact shape of every result row.
///
/// Precondition on the builder: when a relation appears both as a bare
/// foreign-key column and as a nested join at the same level, the column must
/// be declared before the join (the join result supersedes the stub).
pub struct MapperTree {
    root: RowMapper,
    width: usize,
}

impl MapperTree {
    pub fn new(mut root: RowMapper) -> Self {
        let mut next = 0;
        root.number_scopes(&mut next);
        let width = root.width();
        Self { root, width }
    }

    pub fn root(&self) -> &RowMapper {
        &self.root
    }

    /// Declared row width; the query collaborator can assert its SELECT list
    /// length against this before executing.
    pub fn width(&self) -> usize {
        self.width
    }
}
