use pretty_assertions::assert_eq;
use qail_relational::ast::builders::constant;
use qail_relational::prelude::*;

fn types() -> DefaultTypeMappingSource {
    DefaultTypeMappingSource::default()
}

fn product() -> Arc<EntityType> {
    Arc::new(
        EntityType::new("Product", "Products")
            .schema("sales")
            .property(Property::new("Id", HostType::Int32))
            .property(Property::new("Name", HostType::String))
            .property(Property::new("Price", HostType::Decimal)),
    )
}

fn category() -> Arc<EntityType> {
    Arc::new(
        EntityType::new("Category", "Categories")
            .property(Property::new("Id", HostType::Int32))
            .property(Property::new("Title", HostType::String)),
    )
}

fn scalar(n: i64) -> SqlExpression {
    SqlExpression::new(constant(n), types().find_mapping(&HostType::Int64))
}

fn ordering(n: i64) -> OrderingExpression {
    OrderingExpression::asc(scalar(n))
}

#[test]
fn test_new_select_has_one_table_and_root_projection() {
    let select = SelectExpression::new(product(), &types()).unwrap();

    assert_eq!(
        select.tables(),
        &[TableExpression {
            name: "Products".to_string(),
            schema: Some("sales".to_string()),
            alias: "p".to_string(),
        }]
    );
    assert_eq!(select.projection_mapping().len(), 1);
    let (member, value) = select.projection_mapping().first().unwrap();
    assert!(member.is_root());
    let ProjectionValue::Entity(entity) = value else {
        panic!("root projection should be an entity projection");
    };
    assert_eq!(entity.entity_type().name, "Product");
    assert_eq!(entity.table_alias(), "p");
    assert!(select.predicate().is_none());
    assert!(select.orderings().is_empty());
    assert!(select.limit().is_none() && select.offset().is_none());
}

#[test]
fn test_apply_projection_flattens_in_insertion_order() {
    let source = types();
    let mut select = SelectExpression::new(product(), &source).unwrap();

    let category_table = TableExpression {
        name: "Categories".to_string(),
        schema: None,
        alias: "c".to_string(),
    };
    let category_projection = EntityProjection::new(category(), &category_table, &source).unwrap();

    let root = ProjectionMember::root();
    let discount = root.append("Discount");
    let category_member = root.append("Category");
    let rank = root.append("Rank");

    let mut mapping = select.projection_mapping().clone();
    mapping.insert(discount.clone(), scalar(10).into());
    mapping.insert(category_member.clone(), category_projection.into());
    mapping.insert(rank.clone(), scalar(1).into());
    select.set_projection_mapping(mapping).unwrap();

    let indexes = select.apply_projection().unwrap();

    // 3 product columns + 2 category columns + 2 scalars.
    assert_eq!(select.projection().len(), 7);
    assert_eq!(
        indexes.into_iter().collect::<Vec<_>>(),
        vec![(root, 0), (discount, 3), (category_member, 4), (rank, 6)]
    );

    let rendered: Vec<String> = select.projection().iter().map(|p| p.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["p.Id", "p.Name", "p.Price", "10", "c.Id", "c.Title", "1"]
    );
}

#[test]
fn test_apply_projection_twice_is_rejected() {
    let mut select = SelectExpression::new(product(), &types()).unwrap();
    select.apply_projection().unwrap();

    let err = select.apply_projection().unwrap_err();
    assert!(matches!(err, RelationalError::ProjectionAlreadyApplied));
    assert_eq!(select.projection().len(), 3);
    assert_eq!(select.phase(), ProjectionPhase::Applied);
}

#[test]
fn test_order_by_resets_then_by_appends() {
    let mut select = SelectExpression::new(product(), &types()).unwrap();

    select.apply_order_by(ordering(1));
    select.apply_then_by(ordering(2));
    assert_eq!(select.orderings(), &[ordering(1), ordering(2)]);

    select.apply_order_by(ordering(3));
    assert_eq!(select.orderings(), &[ordering(3)]);
}

#[test]
fn test_predicate_is_replaced_not_combined() {
    let mut select = SelectExpression::new(product(), &types()).unwrap();
    let first = SqlExpression::condition(qail_relational::ast::builders::eq(constant(1), constant(1)));
    let second = SqlExpression::condition(qail_relational::ast::builders::eq(constant(2), constant(2)));

    select.apply_predicate(first);
    select.apply_predicate(second.clone());
    assert_eq!(select.predicate(), Some(&second));
}

#[test]
fn test_limit_offset_are_independent() {
    let mut select = SelectExpression::new(product(), &types()).unwrap();
    select.apply_offset(scalar(20));
    select.apply_limit(scalar(10));
    select.apply_offset(scalar(30));

    assert_eq!(select.limit(), Some(&scalar(10)));
    assert_eq!(select.offset(), Some(&scalar(30)));

    // Range checks belong to the caller.
    select.apply_limit(scalar(-1));
    assert_eq!(select.limit(), Some(&scalar(-1)));
}

#[test]
fn test_table_aliases_collide_on_first_letter() {
    // Aliases are the first letter of the table name; nothing de-duplicates them.
    let source = types();
    let customers = Arc::new(
        EntityType::new("Customer", "Customers").property(Property::new("Id", HostType::Int32)),
    );
    let categories = SelectExpression::new(category(), &source).unwrap();
    let customers = SelectExpression::new(customers, &source).unwrap();

    assert_eq!(categories.tables()[0].alias, "c");
    assert_eq!(customers.tables()[0].alias, categories.tables()[0].alias);
}

#[test]
fn test_entity_without_table_is_rejected() {
    let nameless = Arc::new(EntityType::new("Ghost", ""));
    let err = SelectExpression::new(nameless, &types()).unwrap_err();
    assert!(matches!(err, RelationalError::Metadata(_)));
}

#[test]
fn test_entity_without_properties_is_rejected() {
    let empty = Arc::new(EntityType::new("Empty", "Empties"));
    let err = SelectExpression::new(Arc::clone(&empty), &types()).unwrap_err();
    assert!(matches!(err, RelationalError::Metadata(_)));

    let table = TableExpression {
        name: "Empties".to_string(),
        schema: None,
        alias: "e".to_string(),
    };
    let err = EntityProjection::new(empty, &table, &types()).unwrap_err();
    assert!(matches!(err, RelationalError::Metadata(_)));
}

#[test]
fn test_projection_indexes_strictly_increase() {
    let source = types();
    let mut select = SelectExpression::new(category(), &source).unwrap();
    let root = ProjectionMember::root();

    let mut mapping = select.projection_mapping().clone();
    mapping.insert(root.append("X"), scalar(1).into());
    mapping.insert(root.append("Y"), scalar(2).into());
    select.set_projection_mapping(mapping).unwrap();

    let indexes: Vec<usize> = select.apply_projection().unwrap().into_values().collect();
    assert_eq!(indexes, vec![0, 2, 3]);
    assert!(indexes.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_unmapped_property_type_fails_construction() {
    let entity = Arc::new(
        EntityType::new("Shape", "Shapes").property(Property::new("Outline", HostType::from("MultiLineString"))),
    );
    let err = SelectExpression::new(entity, &types()).unwrap_err();
    assert!(matches!(err, RelationalError::UnmappedType(HostType::Named(_))));
}
