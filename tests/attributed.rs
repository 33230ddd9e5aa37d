use std::any::TypeId;

use property_graph::{
    Arena, Attributed, Class, DatumKind, ErrorKind, Field, Pointer, ScopeId, Signature,
    TypeManager,
};

#[derive(Debug, Clone)]
struct Hero {
    health: Field<i32>,
    aliases: Field<String>,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            health: Field::scalar(100),
            aliases: Field::new(vec![String::new(); 3]),
        }
    }
}

impl Class for Hero {
    const NAME: &'static str = "Hero";
}

impl Attributed for Hero {
    fn signatures() -> Vec<Signature> {
        vec![
            Signature::field::<Hero, i32>("Health", 1, |hero| &hero.health),
            Signature::field::<Hero, String>("Aliases", 3, |hero| &hero.aliases),
            Signature::table("Items", 2),
        ]
    }
}

#[derive(Debug, Clone)]
struct Boss {
    base: Hero,
    rage: Field<f32>,
}

impl Default for Boss {
    fn default() -> Self {
        Self {
            base: Hero::default(),
            rage: Field::scalar(0.5),
        }
    }
}

impl Class for Boss {
    const NAME: &'static str = "Boss";
}

impl Attributed for Boss {
    fn signatures() -> Vec<Signature> {
        let mut signatures: Vec<Signature> = Hero::signatures()
            .into_iter()
            .map(|signature| signature.inherit::<Boss, Hero>(|boss| &boss.base))
            .collect();
        signatures.push(Signature::field::<Boss, f32>("Rage", 1, |boss| &boss.rage));
        signatures
    }
}

#[derive(Debug, Clone, Default)]
struct Broken {
    value: Field<i32>,
}

impl Class for Broken {
    const NAME: &'static str = "Broken";
}

impl Attributed for Broken {
    fn signatures() -> Vec<Signature> {
        vec![Signature::field::<Broken, i32>("Value", 2, |broken| &broken.value)]
    }
}

fn types() -> TypeManager {
    let mut types = TypeManager::new();
    types.register::<Hero>();
    types.register::<Boss>();
    types.register::<Broken>();
    types
}

fn hero(arena: &mut Arena, types: &TypeManager) -> ScopeId {
    arena.create_attributed(types, Hero::default()).unwrap()
}

#[test]
fn construction_populates_the_schema() {
    let types = types();
    let mut arena = Arena::new();
    let id = hero(&mut arena, &types);
    let scope = arena.get(id).unwrap();

    assert_eq!(
        scope.names().collect::<Vec<_>>(),
        vec!["this", "Health", "Aliases", "Items"]
    );
    assert_eq!(
        scope.find("this").unwrap().get::<Pointer>(0).unwrap(),
        Pointer::Scope(id)
    );
    assert_eq!(*scope.find("Health").unwrap(), 100);
    assert_eq!(scope.find("Aliases").unwrap().len(), 3);

    let items = scope.find("Items").unwrap();
    assert!(items.is_kind(DatumKind::Table));
    assert_eq!(items.len(), 2);
    for child in items.scopes() {
        assert_eq!(arena.parent(*child).unwrap(), Some(id));
    }
    assert_eq!(arena.len(), 3);
}

#[test]
fn attributes_and_fields_share_storage() {
    let types = types();
    let mut arena = Arena::new();
    let id = hero(&mut arena, &types);

    let scope = arena.get_mut(id).unwrap();
    scope.find_mut("Health").unwrap().set(42, 0).unwrap();
    scope
        .find_mut("Aliases")
        .unwrap()
        .set(String::from("Cap"), 2)
        .unwrap();
    let host = scope.class_as::<Hero>().unwrap();
    assert_eq!(host.health.get(0), Some(42));
    assert_eq!(host.aliases.get(2).unwrap(), "Cap");

    host.health.set(0, 7);
    assert_eq!(*arena.find(id, "Health").unwrap().unwrap(), 7);

    let err = arena
        .get_mut(id)
        .unwrap()
        .find_mut("Health")
        .unwrap()
        .push_back(1)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Ownership);
}

#[test]
fn prescribed_and_auxiliary_are_distinguished() {
    let types = types();
    let mut arena = Arena::new();
    let id = hero(&mut arena, &types);
    arena
        .append_auxiliary_attribute(id, "Mood")
        .unwrap()
        .push_back(String::from("grim"))
        .unwrap();

    let scope = arena.get(id).unwrap();
    assert!(scope.is_prescribed_attribute("this"));
    assert!(scope.is_prescribed_attribute("Items"));
    assert!(!scope.is_auxiliary_attribute("Items"));
    assert!(scope.is_auxiliary_attribute("Mood"));
    assert!(scope.is_attribute("Mood"));
    assert!(!scope.is_attribute("Missing"));
    assert_eq!(
        scope.auxiliary_attributes().map(|(name, _)| name).collect::<Vec<_>>(),
        vec!["Mood"]
    );
    assert_eq!(scope.prescribed_attributes().count(), 4);

    for name in ["Health", "this"] {
        let err = arena.append_auxiliary_attribute(id, name).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Schema);
    }
}

#[test]
fn copies_bind_to_their_own_fields() {
    let types = types();
    let mut arena = Arena::new();
    let original = hero(&mut arena, &types);
    let copy = arena.clone_scope(original).unwrap();

    assert_eq!(
        arena.find(copy, "this").unwrap().unwrap().get::<Pointer>(0).unwrap(),
        Pointer::Scope(copy)
    );
    assert_eq!(arena.find(copy, "Items").unwrap().unwrap().len(), 2);

    arena
        .get_mut(copy)
        .unwrap()
        .find_mut("Health")
        .unwrap()
        .set(1, 0)
        .unwrap();
    let copied = arena.get(copy).unwrap().class_as::<Hero>().unwrap();
    let source = arena.get(original).unwrap().class_as::<Hero>().unwrap();
    assert_eq!(copied.health.get(0), Some(1));
    assert_eq!(source.health.get(0), Some(100));
    assert!(!copied.health.same_storage(&source.health));
    assert!(!arena.scopes_equal(original, copy).unwrap());
}

#[test]
fn derived_classes_extend_the_parent_schema() {
    let types = types();
    let mut arena = Arena::new();
    let id = arena.create_attributed(&types, Boss::default()).unwrap();
    let scope = arena.get(id).unwrap();
    assert_eq!(scope.class_name(), "Boss");
    assert_eq!(scope.schema().unwrap().len(), 4);
    assert_eq!(*scope.find("Rage").unwrap(), 0.5f32);

    arena
        .get_mut(id)
        .unwrap()
        .find_mut("Health")
        .unwrap()
        .set(250, 0)
        .unwrap();
    let boss = arena.get(id).unwrap().class_as::<Boss>().unwrap();
    assert_eq!(boss.base.health.get(0), Some(250));
}

#[test]
fn unregistered_types_have_an_empty_schema() {
    let mut arena = Arena::new();
    let id = arena
        .create_attributed(&TypeManager::new(), Hero::default())
        .unwrap();
    let scope = arena.get(id).unwrap();
    assert!(scope.is_attributed());
    assert!(scope.schema().unwrap().is_empty());
    assert_eq!(scope.names().collect::<Vec<_>>(), vec!["this"]);
}

#[test]
fn mismatched_signatures_are_rejected() {
    let types = types();
    let mut arena = Arena::new();
    let err = arena
        .create_attributed(&types, Broken::default())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Schema);
    assert!(arena.is_empty());
}

#[test]
fn type_manager_registration() {
    let mut types = TypeManager::new();
    assert!(types.register::<Hero>());
    assert!(!types.register::<Hero>());
    assert!(types.is_registered::<Hero>());
    assert!(types.contains(TypeId::of::<Hero>()));
    assert_eq!(types.signatures_for::<Hero>().unwrap().len(), 3);

    assert!(types.add(TypeId::of::<Boss>(), Vec::new()));
    assert_eq!(types.len(), 2);
    assert!(types.remove(TypeId::of::<Boss>()));
    assert!(!types.remove(TypeId::of::<Boss>()));
    assert!(types.unregister::<Hero>());
    assert!(types.is_empty());
}
