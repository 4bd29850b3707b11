//! End-to-end behavior of implicit collections, shadowed fields and
//! references, checked as XML text and as a round trip.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use og_schema::{ClassBuilder, ClassId, ClassRegistry, FieldKey, Graph, ObjectId, Value};

use crate::config::{MapperConfig, ReferenceMode};
use crate::error::{ConfigError, Error, MappingError};
use crate::mapper::{Mapper, MapperBuilder};

// -----------------------------------------------------------------------------
// Fixtures

struct Classes {
    animal: ClassId,
    dog: ClassId,
    cat: ClassId,
    farm: ClassId,
    mega_farm: ClassId,
    room: ClassId,
    person: ClassId,
    house: ClassId,
    zoo: ClassId,
    aquarium: ClassId,
    area: ClassId,
    country: ClassId,
    stable: ClassId,
    basket: ClassId,
    shed: ClassId,
    barn: ClassId,
}

fn setup() -> (MapperBuilder, Classes) {
    let mut classes = ClassRegistry::new();
    let mut add = |builder: ClassBuilder| classes.register(builder).unwrap();

    let animal = add(ClassBuilder::new("Animal").field("name", ClassId::STRING));
    let dog = add(ClassBuilder::new("Dog").extends(animal));
    let cat = add(ClassBuilder::new("Cat").extends(animal));
    let farm = add(
        ClassBuilder::new("Farm")
            .field("size", ClassId::INT)
            .collection_field("animals", ClassId::LIST, animal),
    );
    let mega_farm = add(
        ClassBuilder::new("MegaFarm")
            .extends(farm)
            .field("separator", ClassId::STRING)
            .collection_field("names", ClassId::LIST, ClassId::STRING),
    );
    let room = add(ClassBuilder::new("Room").field("name", ClassId::STRING));
    let person = add(
        ClassBuilder::new("Person")
            .field("name", ClassId::STRING)
            .collection_field("emailAddresses", ClassId::VEC_DEQUE, ClassId::STRING),
    );
    let house = add(
        ClassBuilder::new("House")
            .collection_field("rooms", ClassId::LIST, room)
            .field("separator", ClassId::STRING)
            .collection_field("people", ClassId::LIST, person),
    );
    let zoo = add(ClassBuilder::new("Zoo").collection_field("animals", ClassId::SET, animal));
    let aquarium = add(
        ClassBuilder::new("Aquarium")
            .field("name", ClassId::STRING)
            .collection_field("fish", ClassId::LIST, ClassId::STRING),
    );
    let area = add(
        ClassBuilder::new("Area")
            .extends(farm)
            .collection_field("animals", ClassId::LIST, animal),
    );
    let county = add(ClassBuilder::new("County").extends(area));
    let country = add(
        ClassBuilder::new("Country")
            .extends(county)
            .collection_field("animals", ClassId::LIST, animal),
    );
    let stable = add(ClassBuilder::new("Stable").map_field("horses", ClassId::MAP, ClassId::STRING, animal));

    let shed = add(
        ClassBuilder::new("Shed")
            .collection_field("tools", ClassId::LIST, ClassId::STRING)
            .collection_field("seeds", ClassId::LIST, ClassId::STRING),
    );
    let barn = add(
        ClassBuilder::new("Barn")
            .extends(shed)
            .collection_field("tools", ClassId::LIST, ClassId::STRING)
            .collection_field("seeds", ClassId::LIST, ClassId::STRING),
    );

    let eggs = classes.array_of(ClassId::STRING).unwrap();
    let basket = classes
        .register(ClassBuilder::new("Basket").field("eggs", eggs))
        .unwrap();

    let c = Classes {
        animal,
        dog,
        cat,
        farm,
        mega_farm,
        room,
        person,
        house,
        zoo,
        aquarium,
        area,
        country,
        stable,
        basket,
        shed,
        barn,
    };

    let mut builder = MapperBuilder::new(classes);
    for (name, class) in [
        ("zoo", c.zoo),
        ("farm", c.farm),
        ("animal", c.animal),
        ("dog", c.dog),
        ("cat", c.cat),
        ("room", c.room),
        ("house", c.house),
        ("person", c.person),
        ("area", c.area),
        ("country", c.country),
        ("shed", c.shed),
        ("barn", c.barn),
    ] {
        builder.alias(name, class).unwrap();
    }
    builder.ignore_unknown_elements(true);
    (builder, c)
}

fn xml(lines: &[&str]) -> String {
    lines.join("\n")
}

fn assert_both_ways(mapper: &Mapper, graph: &Graph, root: ObjectId, expected: &str) {
    let root = Value::from(root);
    let text = mapper.to_xml(graph, &root).unwrap();
    assert_eq!(text, expected);

    let (copy, copy_root) = mapper.from_xml(&text).unwrap();
    assert!(graph.isomorphic(&root, &copy, &copy_root), "round trip differs:\n{text}");
}

fn animal(graph: &mut Graph, c: &Classes, class: ClassId, name: &str) -> Value {
    let id = graph.new_fields(class);
    graph.set_field(id, FieldKey::new(c.animal, "name"), Value::text(name));
    id.into()
}

fn animals(graph: &mut Graph, c: &Classes, names: &[&str]) -> Vec<Value> {
    names.iter().map(|name| animal(graph, c, c.animal, name)).collect()
}

fn items(graph: &mut Graph, class: ClassId, values: impl IntoIterator<Item = Value>) -> Value {
    let id = graph.new_items(class);
    for value in values {
        graph.push_item(id, value);
    }
    id.into()
}

fn texts(graph: &mut Graph, class: ClassId, values: &[&str]) -> Value {
    items(graph, class, values.iter().map(|v| Value::text(*v)))
}

/// Creates a farm (or a subclass) owning `animals` in `Farm.animals`.
fn farm(graph: &mut Graph, c: &Classes, class: ClassId, size: i64, animals: Vec<Value>) -> ObjectId {
    let id = graph.new_fields(class);
    graph.set_field(id, FieldKey::new(c.farm, "size"), Value::int(size));
    let list = items(graph, ClassId::VEC, animals);
    graph.set_field(id, FieldKey::new(c.farm, "animals"), list);
    id
}

fn mega_farm(graph: &mut Graph, c: &Classes, names: Option<&[&str]>) -> ObjectId {
    let cattle = animals(graph, c, &["Cow", "Sheep"]);
    let id = farm(graph, c, c.mega_farm, 100, cattle);
    graph.set_field(id, FieldKey::new(c.mega_farm, "separator"), Value::text("---"));
    if let Some(names) = names {
        let list = texts(graph, ClassId::VEC, names);
        graph.set_field(id, FieldKey::new(c.mega_farm, "names"), list);
    }
    id
}

// -----------------------------------------------------------------------------
// Plain farms

const FARM_WITH_LIST: &[&str] = &[
    "<farm>",
    "  <size>100</size>",
    "  <animal>",
    "    <name>Cow</name>",
    "  </animal>",
    "  <animal>",
    "    <name>Sheep</name>",
    "  </animal>",
    "</farm>",
];

#[test]
fn without_implicit_collection() {
    let (builder, c) = setup();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let cattle = animals(&mut graph, &c, &["Cow", "Sheep"]);
    let root = farm(&mut graph, &c, c.farm, 100, cattle);

    let expected = xml(&[
        "<farm>",
        "  <size>100</size>",
        "  <animals>",
        "    <animal>",
        "      <name>Cow</name>",
        "    </animal>",
        "    <animal>",
        "      <name>Sheep</name>",
        "    </animal>",
        "  </animals>",
        "</farm>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn with_list() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let cattle = animals(&mut graph, &c, &["Cow", "Sheep"]);
    let root = farm(&mut graph, &c, c.farm, 100, cattle);

    assert_both_ways(&mapper, &graph, root, &xml(FARM_WITH_LIST));
}

#[test]
fn with_referenced_implicit_element() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let cow = animal(&mut graph, &c, c.animal, "Cow");
    let sheep = animal(&mut graph, &c, c.animal, "Sheep");
    let the_farm = farm(&mut graph, &c, c.farm, 100, [cow.clone(), sheep.clone()].into());
    let list = items(&mut graph, ClassId::VEC, [cow, the_farm.into(), sheep]);
    let list = list.as_object().unwrap();

    let expected = xml(&[
        "<list>",
        "  <animal>",
        "    <name>Cow</name>",
        "  </animal>",
        "  <farm>",
        "    <size>100</size>",
        "    <animal reference=\"../../animal\"/>",
        "    <animal>",
        "      <name>Sheep</name>",
        "    </animal>",
        "  </farm>",
        "  <animal reference=\"../farm/animal[2]\"/>",
        "</list>",
    ]);
    assert_both_ways(&mapper, &graph, list, &expected);
}

#[test]
fn referenced_implicit_element_by_absolute_path_and_id() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    builder.config_mut().reference_mode = ReferenceMode::Absolute;
    let absolute = builder.build().unwrap();

    let (mut builder, _) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    let config = MapperConfig {
        reference_mode: ReferenceMode::Id,
        ignore_unknown_elements: true,
        ..MapperConfig::default()
    };
    let by_id = builder.with_config(config).build().unwrap();

    let mut graph = Graph::new();
    let cow = animal(&mut graph, &c, c.animal, "Cow");
    let sheep = animal(&mut graph, &c, c.animal, "Sheep");
    let the_farm = farm(&mut graph, &c, c.farm, 100, [cow.clone(), sheep.clone()].into());
    let list = items(&mut graph, ClassId::VEC, [cow, the_farm.into(), sheep]);
    let list = list.as_object().unwrap();

    let expected = xml(&[
        "<list>",
        "  <animal>",
        "    <name>Cow</name>",
        "  </animal>",
        "  <farm>",
        "    <size>100</size>",
        "    <animal reference=\"/list/animal\"/>",
        "    <animal>",
        "      <name>Sheep</name>",
        "    </animal>",
        "  </farm>",
        "  <animal reference=\"/list/farm/animal[2]\"/>",
        "</list>",
    ]);
    assert_both_ways(&absolute, &graph, list, &expected);

    let expected = xml(&[
        "<list id=\"1\">",
        "  <animal id=\"2\">",
        "    <name>Cow</name>",
        "  </animal>",
        "  <farm id=\"3\">",
        "    <size>100</size>",
        "    <animal reference=\"2\"/>",
        "    <animal id=\"4\">",
        "      <name>Sheep</name>",
        "    </animal>",
        "  </farm>",
        "  <animal reference=\"4\"/>",
        "</list>",
    ]);
    assert_both_ways(&by_id, &graph, list, &expected);
}

// -----------------------------------------------------------------------------
// Inheritance

#[test]
fn inherits_implicit_collection_from_superclass() {
    let (mut builder, c) = setup();
    builder
        .alias("MEGA-farm", c.mega_farm)
        .unwrap()
        .implicit_collection(c.farm, "animals")
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = mega_farm(&mut graph, &c, None);

    let expected = xml(&[
        "<MEGA-farm>",
        "  <size>100</size>",
        "  <animal>",
        "    <name>Cow</name>",
        "  </animal>",
        "  <animal>",
        "    <name>Sheep</name>",
        "  </animal>",
        "  <separator>---</separator>",
        "</MEGA-farm>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

const MEGA_FARM_WITH_NAMES: &[&str] = &[
    "<MEGA-farm>",
    "  <size>100</size>",
    "  <animal>",
    "    <name>Cow</name>",
    "  </animal>",
    "  <animal>",
    "    <name>Sheep</name>",
    "  </animal>",
    "  <separator>---</separator>",
    "  <name>McDonald</name>",
    "  <name>Ponte Rosa</name>",
    "</MEGA-farm>",
];

#[test]
fn inherited_and_direct_declarations_at_once() {
    let (mut builder, c) = setup();
    builder
        .alias("MEGA-farm", c.mega_farm)
        .unwrap()
        .implicit_collection(c.farm, "animals")
        .unwrap()
        .implicit_collection_named(c.mega_farm, "names", "name", Some(ClassId::STRING))
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = mega_farm(&mut graph, &c, Some(&["McDonald", "Ponte Rosa"]));

    assert_both_ways(&mapper, &graph, root, &xml(MEGA_FARM_WITH_NAMES));
}

#[test]
fn declaration_order_does_not_matter() {
    let (mut builder, c) = setup();
    builder
        .alias("MEGA-farm", c.mega_farm)
        .unwrap()
        .implicit_collection_named(c.mega_farm, "names", "name", Some(ClassId::STRING))
        .unwrap()
        .implicit_collection(c.farm, "animals")
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = mega_farm(&mut graph, &c, Some(&["McDonald", "Ponte Rosa"]));

    assert_both_ways(&mapper, &graph, root, &xml(MEGA_FARM_WITH_NAMES));
}

#[test]
fn subclass_overrides_implicit_collection_of_superclass() {
    let (mut builder, c) = setup();
    builder
        .alias("MEGA-farm", c.mega_farm)
        .unwrap()
        .implicit_collection(c.mega_farm, "animals")
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = mega_farm(&mut graph, &c, None);

    let text = mapper.to_xml(&graph, &root.into()).unwrap();
    assert!(text.starts_with("<MEGA-farm>\n  <size>100</size>\n  <animal>\n"));
    assert_both_ways(&mapper, &graph, root, &text);

    // The declaration on the subclass leaves the superclass wrapped.
    let mut graph = Graph::new();
    let cattle = animals(&mut graph, &c, &["Cow"]);
    let root = farm(&mut graph, &c, c.farm, 1, cattle);
    let text = mapper.to_xml(&graph, &root.into()).unwrap();
    assert!(text.contains("<animals>"));
}

#[test]
fn different_definitions_in_subclass() {
    let (mut builder, c) = setup();
    builder
        .alias("MEGA-farm", c.mega_farm)
        .unwrap()
        .implicit_collection_named(c.farm, "animals", "fish", Some(c.animal))
        .unwrap()
        .implicit_collection(c.mega_farm, "animals")
        .unwrap()
        .implicit_collection_named(c.mega_farm, "names", "name", Some(ClassId::STRING))
        .unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let fish = animals(&mut graph, &c, &["Cod", "Salmon"]);
    let small = farm(&mut graph, &c, c.farm, 10, fish);
    let big = mega_farm(&mut graph, &c, Some(&["McDonald", "Ponte Rosa"]));
    let list = items(&mut graph, ClassId::VEC, [small.into(), big.into()]);

    let expected = xml(&[
        "<list>",
        "  <farm>",
        "    <size>10</size>",
        "    <fish>",
        "      <name>Cod</name>",
        "    </fish>",
        "    <fish>",
        "      <name>Salmon</name>",
        "    </fish>",
        "  </farm>",
        "  <MEGA-farm>",
        "    <size>100</size>",
        "    <animal>",
        "      <name>Cow</name>",
        "    </animal>",
        "    <animal>",
        "      <name>Sheep</name>",
        "    </animal>",
        "    <separator>---</separator>",
        "    <name>McDonald</name>",
        "    <name>Ponte Rosa</name>",
        "  </MEGA-farm>",
        "</list>",
    ]);
    assert_both_ways(&mapper, &graph, list.as_object().unwrap(), &expected);
}

// -----------------------------------------------------------------------------
// Houses

fn house(graph: &mut Graph, c: &Classes, rooms: Value, people: Value) -> ObjectId {
    let id = graph.new_fields(c.house);
    graph.set_field(id, FieldKey::new(c.house, "rooms"), rooms);
    graph.set_field(id, FieldKey::new(c.house, "separator"), Value::text("---"));
    graph.set_field(id, FieldKey::new(c.house, "people"), people);
    id
}

fn named(graph: &mut Graph, class: ClassId, name: &str) -> ObjectId {
    let id = graph.new_fields(class);
    graph.set_field(id, FieldKey::new(class, "name"), Value::text(name));
    id
}

#[test]
fn default_collection_based_on_type() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection_of(c.house, "rooms", c.room)
        .unwrap()
        .implicit_collection_of(c.house, "people", c.person)
        .unwrap()
        .implicit_collection_named(c.person, "emailAddresses", "email", Some(ClassId::STRING))
        .unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let kitchen = named(&mut graph, c.room, "kitchen");
    let bathroom = named(&mut graph, c.room, "bathroom");
    let rooms = items(&mut graph, ClassId::VEC, [kitchen.into(), bathroom.into()]);

    let mut people = Vec::new();
    for (name, emails) in [
        ("joe", &["joe@house.org", "joe.farmer@house.org"][..]),
        (
            "jaimie",
            &["jaimie@house.org", "jaimie.farmer@house.org", "jaimie.ann.farmer@house.org"][..],
        ),
    ] {
        let person = named(&mut graph, c.person, name);
        let emails = texts(&mut graph, ClassId::VEC_DEQUE, emails);
        graph.set_field(person, FieldKey::new(c.person, "emailAddresses"), emails);
        people.push(person.into());
    }
    let people = items(&mut graph, ClassId::VEC, people);
    let root = house(&mut graph, &c, rooms, people);

    let expected = xml(&[
        "<house>",
        "  <room>",
        "    <name>kitchen</name>",
        "  </room>",
        "  <room>",
        "    <name>bathroom</name>",
        "  </room>",
        "  <separator>---</separator>",
        "  <person>",
        "    <name>joe</name>",
        "    <email>joe@house.org</email>",
        "    <email>joe.farmer@house.org</email>",
        "  </person>",
        "  <person>",
        "    <name>jaimie</name>",
        "    <email>jaimie@house.org</email>",
        "    <email>jaimie.farmer@house.org</email>",
        "    <email>jaimie.ann.farmer@house.org</email>",
        "  </person>",
        "</house>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn empty_lists_write_nothing() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection_of(c.house, "rooms", c.room)
        .unwrap()
        .implicit_collection_of(c.house, "people", c.person)
        .unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let rooms = items(&mut graph, ClassId::VEC, []);
    let people = items(&mut graph, ClassId::VEC, []);
    let root = house(&mut graph, &c, rooms, people);

    let expected = xml(&["<house>", "  <separator>---</separator>", "</house>"]);
    assert_eq!(mapper.to_xml(&graph, &root.into()).unwrap(), expected);
}

// -----------------------------------------------------------------------------
// Sets

const ZOO: &[&str] = &[
    "<zoo>",
    "  <animal>",
    "    <name>Lion</name>",
    "  </animal>",
    "  <animal>",
    "    <name>Ape</name>",
    "  </animal>",
    "</zoo>",
];

fn zoo(graph: &mut Graph, c: &Classes, set: ClassId) -> ObjectId {
    let members = animals(graph, c, &["Lion", "Ape"]);
    let set = items(graph, set, members);
    let id = graph.new_fields(c.zoo);
    graph.set_field(id, FieldKey::new(c.zoo, "animals"), set);
    id
}

#[test]
fn with_set() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.zoo, "animals").unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = zoo(&mut graph, &c, ClassId::HASH_SET);

    assert_both_ways(&mapper, &graph, root, &xml(ZOO));
}

#[test]
fn with_different_default_implementation() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection(c.zoo, "animals")
        .unwrap()
        .add_default_implementation(ClassId::INDEX_SET, ClassId::SET)
        .unwrap();
    let mapper = builder.build().unwrap();

    let (graph, root) = mapper.from_xml(&xml(ZOO)).unwrap();
    let root = root.as_object().unwrap();
    let set = graph.field(root, &FieldKey::new(c.zoo, "animals")).unwrap();
    let set = set.as_object().unwrap();
    assert_eq!(graph.class_of(set), Some(ClassId::INDEX_SET));
    assert_eq!(graph.items(set).unwrap().len(), 2);

    let mut built = Graph::new();
    let expected = zoo(&mut built, &c, ClassId::INDEX_SET);
    assert!(built.isomorphic(&expected.into(), &graph, &root.into()));
}

#[test]
fn sets_drop_repeated_items() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.zoo, "animals").unwrap();
    let mapper = builder.build().unwrap();

    let text = xml(&[
        "<zoo>",
        "  <animal>",
        "    <name>Lion</name>",
        "  </animal>",
        "  <animal reference=\"../animal\"/>",
        "</zoo>",
    ]);
    let (graph, root) = mapper.from_xml(&text).unwrap();
    let set = graph
        .field(root.as_object().unwrap(), &FieldKey::new(c.zoo, "animals"))
        .and_then(Value::as_object)
        .unwrap();
    assert_eq!(graph.items(set).unwrap().len(), 1);
}

// -----------------------------------------------------------------------------
// Aquariums

const AQUARIUM: &[&str] = &[
    "<aquarium>",
    "  <name>hatchery</name>",
    "  <fish>salmon</fish>",
    "  <fish>halibut</fish>",
    "  <fish>snapper</fish>",
    "</aquarium>",
];

fn aquarium(graph: &mut Graph, c: &Classes) -> ObjectId {
    let id = graph.new_fields(c.aquarium);
    graph.set_field(id, FieldKey::new(c.aquarium, "name"), Value::text("hatchery"));
    let fish = texts(graph, ClassId::VEC, &["salmon", "halibut", "snapper"]);
    graph.set_field(id, FieldKey::new(c.aquarium, "fish"), fish);
    id
}

#[test]
fn explicit_item_name_matching_the_field_name() {
    let (mut builder, c) = setup();
    builder
        .alias("aquarium", c.aquarium)
        .unwrap()
        .implicit_collection_named(c.aquarium, "fish", "fish", Some(ClassId::STRING))
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = aquarium(&mut graph, &c);

    assert_both_ways(&mapper, &graph, root, &xml(AQUARIUM));
}

#[test]
fn implicit_item_name_matching_the_field_name() {
    let (mut builder, c) = setup();
    builder
        .alias("aquarium", c.aquarium)
        .unwrap()
        .alias("fish", ClassId::STRING)
        .unwrap()
        .implicit_collection(c.aquarium, "fish")
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = aquarium(&mut graph, &c);

    assert_both_ways(&mapper, &graph, root, &xml(AQUARIUM));
}

#[test]
fn aliased_item_name_matching_the_aliased_field_name() {
    let (mut builder, c) = setup();
    builder
        .alias("aquarium", c.aquarium)
        .unwrap()
        .alias_field("animal", c.aquarium, "fish")
        .unwrap()
        .implicit_collection_named(c.aquarium, "fish", "animal", Some(ClassId::STRING))
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = aquarium(&mut graph, &c);

    let expected = xml(&[
        "<aquarium>",
        "  <name>hatchery</name>",
        "  <animal>salmon</animal>",
        "  <animal>halibut</animal>",
        "  <animal>snapper</animal>",
        "</aquarium>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn can_be_declared_only_for_collections() {
    let (mut builder, c) = setup();
    let err = builder.implicit_collection(c.animal, "name").unwrap_err();
    assert!(err.to_string().contains("declares no collection"));
    assert!(matches!(err, ConfigError::NotACollection { .. }));
}

// -----------------------------------------------------------------------------
// Null elements

#[test]
fn with_null_element() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let cow = animal(&mut graph, &c, c.animal, "Cow");
    let root = farm(&mut graph, &c, c.farm, 100, [Value::Null, cow].into());

    let expected = xml(&[
        "<farm>",
        "  <size>100</size>",
        "  <null/>",
        "  <animal>",
        "    <name>Cow</name>",
        "  </animal>",
        "</farm>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn with_alias_and_null_element() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection_named(c.farm, "animals", "beast", Some(c.animal))
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let cow = animal(&mut graph, &c, c.animal, "Cow");
    let root = farm(&mut graph, &c, c.farm, 100, [Value::Null, cow].into());

    let expected = xml(&[
        "<farm>",
        "  <size>100</size>",
        "  <null/>",
        "  <beast>",
        "    <name>Cow</name>",
        "  </beast>",
        "</farm>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

// -----------------------------------------------------------------------------
// Hidden lists

fn area(graph: &mut Graph, c: &Classes) -> ObjectId {
    let cattle = animals(graph, c, &["Cow", "Sheep"]);
    let id = farm(graph, c, c.area, 1000, cattle);
    let birds = animals(graph, c, &["Falcon", "Sparrow"]);
    let birds = items(graph, ClassId::VEC, birds);
    graph.set_field(id, FieldKey::new(c.area, "animals"), birds);
    id
}

#[test]
fn with_hidden_list() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection(c.farm, "animals")
        .unwrap()
        .implicit_collection(c.area, "animals")
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = area(&mut graph, &c);

    let expected = xml(&[
        "<area>",
        "  <size>1000</size>",
        "  <animal defined-in=\"farm\">",
        "    <name>Cow</name>",
        "  </animal>",
        "  <animal defined-in=\"farm\">",
        "    <name>Sheep</name>",
        "  </animal>",
        "  <animal>",
        "    <name>Falcon</name>",
        "  </animal>",
        "  <animal>",
        "    <name>Sparrow</name>",
        "  </animal>",
        "</area>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn with_hidden_list_and_different_alias() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection_named(c.farm, "animals", "domesticated", Some(c.animal))
        .unwrap()
        .implicit_collection_named(c.area, "animals", "wild", Some(c.animal))
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = area(&mut graph, &c);

    let expected = xml(&[
        "<area>",
        "  <size>1000</size>",
        "  <domesticated defined-in=\"farm\">",
        "    <name>Cow</name>",
        "  </domesticated>",
        "  <domesticated defined-in=\"farm\">",
        "    <name>Sheep</name>",
        "  </domesticated>",
        "  <wild>",
        "    <name>Falcon</name>",
        "  </wild>",
        "  <wild>",
        "    <name>Sparrow</name>",
        "  </wild>",
        "</area>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn does_not_inherit_from_hidden_list_of_superclass() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = area(&mut graph, &c);

    let expected = xml(&[
        "<area>",
        "  <size>1000</size>",
        "  <animal defined-in=\"farm\">",
        "    <name>Cow</name>",
        "  </animal>",
        "  <animal defined-in=\"farm\">",
        "    <name>Sheep</name>",
        "  </animal>",
        "  <animals>",
        "    <animal>",
        "      <name>Falcon</name>",
        "    </animal>",
        "    <animal>",
        "      <name>Sparrow</name>",
        "    </animal>",
        "  </animals>",
        "</area>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn does_not_propagate_to_hidden_list_of_superclass() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.area, "animals").unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let root = area(&mut graph, &c);

    let expected = xml(&[
        "<area>",
        "  <size>1000</size>",
        "  <animals defined-in=\"farm\">",
        "    <animal>",
        "      <name>Cow</name>",
        "    </animal>",
        "    <animal>",
        "      <name>Sheep</name>",
        "    </animal>",
        "  </animals>",
        "  <animal>",
        "    <name>Falcon</name>",
        "  </animal>",
        "  <animal>",
        "    <name>Sparrow</name>",
        "  </animal>",
        "</area>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn with_double_hidden_list() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection(c.farm, "animals")
        .unwrap()
        .implicit_collection(c.area, "animals")
        .unwrap()
        .implicit_collection(c.country, "animals")
        .unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let cattle = animals(&mut graph, &c, &["Cow", "Sheep"]);
    let root = farm(&mut graph, &c, c.country, 10, cattle);
    for (declaring, names) in [(c.area, ["Falcon", "Sparrow"]), (c.country, ["Wale", "Dolphin"])] {
        let members = animals(&mut graph, &c, &names);
        let list = items(&mut graph, ClassId::VEC, members);
        graph.set_field(root, FieldKey::new(declaring, "animals"), list);
    }

    let expected = xml(&[
        "<country>",
        "  <size>10</size>",
        "  <animal defined-in=\"farm\">",
        "    <name>Cow</name>",
        "  </animal>",
        "  <animal defined-in=\"farm\">",
        "    <name>Sheep</name>",
        "  </animal>",
        "  <animal defined-in=\"area\">",
        "    <name>Falcon</name>",
        "  </animal>",
        "  <animal defined-in=\"area\">",
        "    <name>Sparrow</name>",
        "  </animal>",
        "  <animal>",
        "    <name>Wale</name>",
        "  </animal>",
        "  <animal>",
        "    <name>Dolphin</name>",
        "  </animal>",
        "</country>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn null_markers_follow_their_siblings() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection(c.farm, "animals")
        .unwrap()
        .implicit_collection(c.area, "animals")
        .unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let cow = animal(&mut graph, &c, c.animal, "Cow");
    let root = farm(&mut graph, &c, c.area, 5, [cow, Value::Null].into());
    let falcon = animal(&mut graph, &c, c.animal, "Falcon");
    let birds = items(&mut graph, ClassId::VEC, [falcon, Value::Null]);
    graph.set_field(root, FieldKey::new(c.area, "animals"), birds);

    let text = mapper.to_xml(&graph, &root.into()).unwrap();
    assert!(text.contains("  <null defined-in=\"farm\"/>\n  <animal>\n"));
    assert!(text.ends_with("  </animal>\n  <null/>\n</area>"));
    assert_both_ways(&mapper, &graph, root, &text);
}

fn house_mapper(c: &Classes, mut builder: MapperBuilder) -> Mapper {
    builder
        .implicit_collection_of(c.house, "rooms", c.room)
        .unwrap()
        .implicit_collection_of(c.house, "people", c.person)
        .unwrap();
    builder.build().unwrap()
}

/// A house whose rooms and people are lists of names, `None` for null.
fn crowded_house(
    graph: &mut Graph,
    c: &Classes,
    rooms: &[Option<&str>],
    separator: Option<&str>,
    people: &[Option<&str>],
) -> ObjectId {
    let list = |graph: &mut Graph, class: ClassId, names: &[Option<&str>]| {
        let values: Vec<Value> = names
            .iter()
            .map(|name| match name {
                Some(name) => named(graph, class, name).into(),
                None => Value::Null,
            })
            .collect();
        items(graph, ClassId::VEC, values)
    };
    let rooms = list(graph, c.room, rooms);
    let people = list(graph, c.person, people);
    let id = graph.new_fields(c.house);
    graph.set_field(id, FieldKey::new(c.house, "rooms"), rooms);
    if let Some(separator) = separator {
        graph.set_field(id, FieldKey::new(c.house, "separator"), Value::text(separator));
    }
    graph.set_field(id, FieldKey::new(c.house, "people"), people);
    id
}

fn null_is_ambiguous(result: Result<String, Error>) {
    assert_eq!(
        result,
        Err(Error::Mapping(MappingError::AmbiguousMapping {
            class: "House".into(),
            tag: "null".into(),
        }))
    );
}

#[test]
fn null_after_an_item_stays_in_its_collection() {
    let (builder, c) = setup();
    let mapper = house_mapper(&c, builder);
    let mut graph = Graph::new();
    let root = crowded_house(&mut graph, &c, &[Some("kitchen"), None], Some("---"), &[Some("joe"), None]);

    let expected = xml(&[
        "<house>",
        "  <room>",
        "    <name>kitchen</name>",
        "  </room>",
        "  <null/>",
        "  <separator>---</separator>",
        "  <person>",
        "    <name>joe</name>",
        "  </person>",
        "  <null/>",
        "</house>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn leading_null_among_several_collections_is_refused() {
    let (builder, c) = setup();
    let mapper = house_mapper(&c, builder);

    let mut graph = Graph::new();
    let root = crowded_house(&mut graph, &c, &[None, Some("kitchen")], Some("---"), &[Some("joe")]);
    null_is_ambiguous(mapper.to_xml(&graph, &root.into()));

    // Without a separator the null would be read into the rooms.
    let mut graph = Graph::new();
    let root = crowded_house(&mut graph, &c, &[Some("kitchen")], None, &[None, Some("joe")]);
    null_is_ambiguous(mapper.to_xml(&graph, &root.into()));
}

#[test]
fn null_after_an_item_of_a_hidden_collection() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection_named(c.shed, "tools", "tool", None)
        .unwrap()
        .implicit_collection_named(c.shed, "seeds", "seed", None)
        .unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let tools = items(&mut graph, ClassId::VEC, [Value::text("rake"), Value::Null]);
    let seeds = items(&mut graph, ClassId::VEC, [Value::text("corn"), Value::Null]);
    let root = graph.new_fields(c.barn);
    graph.set_field(root, FieldKey::new(c.shed, "tools"), tools);
    graph.set_field(root, FieldKey::new(c.shed, "seeds"), seeds);

    let expected = xml(&[
        "<barn>",
        "  <tool defined-in=\"shed\">rake</tool>",
        "  <null defined-in=\"shed\"/>",
        "  <seed defined-in=\"shed\">corn</seed>",
        "  <null defined-in=\"shed\"/>",
        "</barn>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);

    let mut graph = Graph::new();
    let tools = items(&mut graph, ClassId::VEC, [Value::Null]);
    let root = graph.new_fields(c.barn);
    graph.set_field(root, FieldKey::new(c.shed, "tools"), tools);
    assert_eq!(
        mapper.to_xml(&graph, &root.into()),
        Err(Error::Mapping(MappingError::AmbiguousMapping {
            class: "Barn".into(),
            tag: "null".into(),
        }))
    );
}

// -----------------------------------------------------------------------------
// Item types

#[test]
fn collects_different_types_with_field_of_same_name() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let pets = [
        (c.dog, "Lessie"),
        (c.cat, "Garfield"),
        (c.cat, "Felix"),
        (c.dog, "Cujo"),
        (c.cat, "Bob"),
    ]
    .map(|(class, name)| animal(&mut graph, &c, class, name));
    let root = farm(&mut graph, &c, c.farm, 100, pets.into());

    let expected = xml(&[
        "<farm>",
        "  <size>100</size>",
        "  <dog>",
        "    <name>Lessie</name>",
        "  </dog>",
        "  <cat>",
        "    <name>Garfield</name>",
        "  </cat>",
        "  <cat>",
        "    <name>Felix</name>",
        "  </cat>",
        "  <dog>",
        "    <name>Cujo</name>",
        "  </dog>",
        "  <cat>",
        "    <name>Bob</name>",
        "  </cat>",
        "</farm>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn subclass_items_under_an_item_name_carry_their_class() {
    let (mut builder, c) = setup();
    builder
        .implicit_collection_named(c.farm, "animals", "beast", Some(c.animal))
        .unwrap();
    let mapper = builder.build().unwrap();
    let mut graph = Graph::new();
    let rex = animal(&mut graph, &c, c.dog, "Rex");
    let root = farm(&mut graph, &c, c.farm, 1, [rex].into());

    let expected = xml(&[
        "<farm>",
        "  <size>1</size>",
        "  <beast class=\"dog\">",
        "    <name>Rex</name>",
        "  </beast>",
        "</farm>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

// -----------------------------------------------------------------------------
// Maps and arrays

#[test]
fn implicit_map_takes_keys_from_the_items() {
    let (mut builder, c) = setup();
    builder
        .alias("stable", c.stable)
        .unwrap()
        .implicit_map(c.stable, "horses", Some("horse"), None, "name")
        .unwrap();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let map = graph.new_entries(ClassId::HASH_MAP);
    for name in ["Blaze", "Storm"] {
        let horse = animal(&mut graph, &c, c.animal, name);
        graph.insert_entry(map, Value::text(name), horse);
    }
    let root = graph.new_fields(c.stable);
    graph.set_field(root, FieldKey::new(c.stable, "horses"), map.into());

    let expected = xml(&[
        "<stable>",
        "  <horse>",
        "    <name>Blaze</name>",
        "  </horse>",
        "  <horse>",
        "    <name>Storm</name>",
        "  </horse>",
        "</stable>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn implicit_array() {
    let (mut builder, c) = setup();
    builder
        .alias("basket", c.basket)
        .unwrap()
        .implicit_collection_named(c.basket, "eggs", "egg", None)
        .unwrap();
    let mapper = builder.build().unwrap();

    let eggs = mapper.classes().find_array(ClassId::STRING).unwrap();
    let mut graph = Graph::new();
    let array = texts(&mut graph, eggs, &["brown", "white"]);
    let root = graph.new_fields(c.basket);
    graph.set_field(root, FieldKey::new(c.basket, "eggs"), array);

    let expected = xml(&[
        "<basket>",
        "  <egg>brown</egg>",
        "  <egg>white</egg>",
        "</basket>",
    ]);
    assert_both_ways(&mapper, &graph, root, &expected);
}

#[test]
fn wrapped_array_is_named_after_its_items() {
    let (builder, _) = setup();
    let mapper = builder.build().unwrap();

    let eggs = mapper.classes().find_array(ClassId::STRING).unwrap();
    let mut graph = Graph::new();
    let array = texts(&mut graph, eggs, &["brown"]);
    let list = items(&mut graph, ClassId::VEC, [array]);

    let expected = xml(&[
        "<list>",
        "  <string-array>",
        "    <string>brown</string>",
        "  </string-array>",
        "</list>",
    ]);
    assert_both_ways(&mapper, &graph, list.as_object().unwrap(), &expected);
}

// -----------------------------------------------------------------------------
// Whitespace

#[test]
fn leaf_whitespace_survives() {
    let (builder, c) = setup();
    let mapper = builder.build().unwrap();

    let mut graph = Graph::new();
    let cow = animal(&mut graph, &c, c.animal, "  Cow  ");
    let list = items(&mut graph, ClassId::VEC, [cow, Value::char(' '), Value::text("   ")]);

    let expected = xml(&[
        "<list>",
        "  <animal>",
        "    <name>  Cow  </name>",
        "  </animal>",
        "  <char> </char>",
        "  <string>   </string>",
        "</list>",
    ]);
    assert_both_ways(&mapper, &graph, list.as_object().unwrap(), &expected);
}

// -----------------------------------------------------------------------------
// Tolerance

#[test]
fn unknown_elements() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    let tolerant = builder.build().unwrap();

    let (mut builder, _) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    builder.ignore_unknown_elements(false);
    let strict = builder.build().unwrap();

    let text = xml(&[
        "<farm>",
        "  <size>100</size>",
        "  <tractor>",
        "    <brand>Deere</brand>",
        "  </tractor>",
        "  <animal>",
        "    <name>Cow</name>",
        "  </animal>",
        "</farm>",
    ]);

    let (graph, root) = tolerant.from_xml(&text).unwrap();
    let mut expected = Graph::new();
    let cow = animal(&mut expected, &c, c.animal, "Cow");
    let expected_root = farm(&mut expected, &c, c.farm, 100, [cow].into());
    assert!(expected.isomorphic(&expected_root.into(), &graph, &root));

    let err = strict.from_xml(&text).unwrap_err();
    assert_eq!(
        err,
        Error::Mapping(MappingError::UnresolvedSlot {
            class: "Farm".into(),
            tag: "tractor".into(),
        })
    );
}

#[test]
fn dangling_reference() {
    let (mut builder, c) = setup();
    builder.implicit_collection(c.farm, "animals").unwrap();
    let mapper = builder.build().unwrap();

    let text = xml(&["<farm>", "  <animal reference=\"../../animal[4]\"/>", "</farm>"]);
    assert!(matches!(
        mapper.from_xml(&text),
        Err(Error::Mapping(MappingError::InvalidReference(_)))
    ));
}
