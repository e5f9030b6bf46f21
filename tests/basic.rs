////////////////////////////////////////////////////////////////////////////////
// This file is part of "Lineage", a runtime type information library with    //
// class hierarchies, constant-time cross-casting, and typed visitors.        //
//                                                                            //
// This work is licensed under the Apache License, Version 2.0. You may       //
// obtain a copy of the License at                                            //
//                                                                            //
//     http://www.apache.org/licenses/LICENSE-2.0                             //
//                                                                            //
// Unless required by applicable law or agreed to in writing, software        //
// distributed under the License is distributed on an "AS IS" BASIS,          //
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.   //
////////////////////////////////////////////////////////////////////////////////

use std::sync::LazyLock;

use lineage::{
    rtti,
    rtti::{Class, ClassId, ClassMeta, CrossPtrs, Hierarchy, Instance, Layer, Object},
};

struct Animal {
    name: &'static str,
}

struct Pet {
    animal: Animal,
    owner: &'static str,
}

struct Tool {
    weight: u32,
}

rtti! {
    impl Animal as "Animal" {}
    impl Pet as "Pet" { animal: Animal }
    impl Tool as "Tool" {}
}

#[test]
fn exact_identity() {
    let pet = Instance::new(Pet {
        animal: Animal { name: "Rex" },
        owner: "Sam",
    });

    assert_eq!(pet.rtti().name(), "Pet");
    assert_eq!(pet.rtti().id(), Pet::CLASS_ID);

    assert!(pet.is_exact::<Pet>());
    assert!(!pet.is_exact::<Animal>());
}

#[test]
fn upcast_aliases_the_object() {
    let mut pet = Instance::new(Pet {
        animal: Animal { name: "Rex" },
        owner: "Sam",
    });

    assert_eq!(pet.cast::<Animal>().name, "Rex");
    assert_eq!(pet.owner, "Sam");

    pet.cast_mut::<Animal>().name = "Max";

    assert_eq!(pet.animal.name, "Max");
    assert_eq!(pet.try_cast::<Animal>().map(|animal| animal.name), Some("Max"));
}

#[test]
fn cast_outside_of_ancestry_misses() {
    let pet = Instance::new(Pet {
        animal: Animal { name: "Rex" },
        owner: "Sam",
    });

    assert!(pet.try_cast::<Tool>().is_none());
}

#[test]
#[should_panic(expected = "Invalid cast")]
fn reference_form_cast_miss_is_fatal() {
    let pet = Instance::new(Pet {
        animal: Animal { name: "Rex" },
        owner: "Sam",
    });

    let _ = pet.cast::<Tool>().weight;
}

#[repr(C)]
struct Swimmer {
    depth: u32,
}

#[repr(C)]
struct Flyer {
    altitude: u32,
}

#[repr(C)]
struct Duck {
    swimmer: Swimmer,
    flyer: Flyer,
    quacks: bool,
}

rtti! {
    impl Swimmer as "Swimmer" {}
    impl Flyer as "Flyer" {}
    impl Duck as "Duck" { swimmer: Swimmer, flyer: Flyer }
}

#[test]
fn multiple_parents_ancestry() {
    let _ = Duck::class_meta();

    let hierarchy = Hierarchy::global();

    assert!(hierarchy.is_ancestor(Duck::CLASS_ID, Swimmer::CLASS_ID));
    assert!(hierarchy.is_ancestor(Duck::CLASS_ID, Flyer::CLASS_ID));
    assert!(hierarchy.is_ancestor(Duck::CLASS_ID, Object::CLASS_ID));

    assert!(!hierarchy.is_ancestor(Swimmer::CLASS_ID, Duck::CLASS_ID));
    assert!(!hierarchy.is_ancestor(Swimmer::CLASS_ID, Flyer::CLASS_ID));
}

#[test]
fn cross_cast_reaches_every_parent() {
    let duck = Instance::new(Duck {
        swimmer: Swimmer { depth: 3 },
        flyer: Flyer { altitude: 90 },
        quacks: true,
    });

    assert!(duck.quacks);
    assert_eq!(duck.cast::<Swimmer>().depth, 3);
    assert_eq!(duck.cast::<Flyer>().altitude, 90);
}

#[test]
fn fast_cast_requires_a_zero_adjustment() {
    let duck = Instance::new(Duck {
        swimmer: Swimmer { depth: 3 },
        flyer: Flyer { altitude: 90 },
        quacks: true,
    });

    // The first parent layer shares the base address; the second does not.
    assert!(duck.fast_cast::<Duck>().is_some());
    assert!(duck.fast_cast::<Swimmer>().is_some());
    assert!(duck.fast_cast::<Object>().is_some());

    assert!(duck.fast_cast::<Flyer>().is_none());
    assert!(duck.try_cast::<Flyer>().is_some());
}

#[test]
fn type_erased_view() {
    let duck = Instance::new(Duck {
        swimmer: Swimmer { depth: 7 },
        flyer: Flyer { altitude: 10 },
        quacks: false,
    });

    let object = duck.as_object();

    assert_eq!(object.rtti().name(), "Duck");
    assert!(object.is_exact::<Duck>());

    let swimmer = object.cast::<Swimmer>();

    assert_eq!(swimmer.depth, 7);
    assert!(object.try_cast::<Tool>().is_none());
    assert!(object.fast_cast::<Flyer>().is_none());
}

struct Device {
    volts: u8,
}

struct Scanner {
    device: Device,
    dpi: u32,
}

struct Printer {
    device: Device,
    ppm: u32,
}

struct Copier {
    scanner: Scanner,
    printer: Printer,
}

rtti! {
    impl Device as "Device" {}
    impl Scanner as "Scanner" { device: Device }
    impl Printer as "Printer" { device: Device }
    impl Copier as "Copier" { scanner: Scanner, printer: Printer }
}

fn names(walk: impl FnOnce(&mut dyn FnMut(&'static ClassMeta) -> bool) -> bool) -> Vec<&'static str> {
    let mut trace = Vec::new();

    let complete = walk(&mut |meta| {
        trace.push(meta.name());
        true
    });

    assert!(complete);

    trace
}

#[test]
fn diamond_traversal_orders() {
    let start = Copier::class_meta().id();

    let hierarchy = Hierarchy::global();

    let windup = names(|visit| hierarchy.windup(start, visit));
    let unwind = names(|visit| hierarchy.unwind(start, visit));

    assert_eq!(windup, ["Object", "Device", "Scanner", "Printer", "Copier"]);
    assert_eq!(unwind, ["Copier", "Printer", "Scanner", "Device", "Object"]);
}

#[test]
fn diamond_base_resolves_to_its_first_reachability() {
    let copier = Instance::new(Copier {
        scanner: Scanner {
            device: Device { volts: 5 },
            dpi: 600,
        },
        printer: Printer {
            device: Device { volts: 9 },
            ppm: 20,
        },
    });

    assert_eq!(copier.cast::<Scanner>().dpi, 600);
    assert_eq!(copier.cast::<Printer>().ppm, 20);

    // The shared base is recorded once, from the first derivation path.
    let device = copier.cast::<Device>();

    assert_eq!(device.volts, 5);
    assert!(std::ptr::eq(device, &copier.scanner.device));
}

struct Base {
    tag: u8,
}

struct A {
    base: Base,
}

struct B {
    base: Base,
}

struct C {
    base: Base,
}

struct X {
    c: C,
    a: A,
    b: B,
}

struct Z {
    x: X,
}

rtti! {
    impl Base as "Base" {}
    impl A as "A" { base: Base }
    impl B as "B" { base: Base }
    impl C as "C" { base: Base }
    impl X as "X" { c: C, a: A, b: B }
    impl Z as "Z" { x.c: C, x: X }
}

#[test]
fn deep_diamond_traversal_orders() {
    let start = Z::class_meta().id();

    let hierarchy = Hierarchy::global();

    let windup = names(|visit| hierarchy.windup(start, visit));
    let unwind = names(|visit| hierarchy.unwind(start, visit));

    assert_eq!(windup, ["Object", "Base", "C", "A", "B", "X", "Z"]);
    assert_eq!(unwind, ["Z", "X", "B", "A", "C", "Base", "Object"]);

    let layers = |trace: &[&'static str]| {
        trace
            .iter()
            .copied()
            .filter(|name| *name != "Object" && *name != "Base")
            .collect::<String>()
    };

    assert_eq!(layers(&windup), "CABXZ");
    assert_eq!(layers(&unwind), "ZXBAC");
}

#[test]
fn deep_diamond_shared_base_aliasing() {
    let z = Instance::new(Z {
        x: X {
            c: C { base: Base { tag: 3 } },
            a: A { base: Base { tag: 1 } },
            b: B { base: Base { tag: 2 } },
        },
    });

    assert!(z.is_exact::<Z>());

    assert!(std::ptr::eq(z.cast::<X>(), &z.x));

    // The shared ancestors resolve to their first reachability: the layers
    // reached through the directly declared `C` parent.
    assert!(std::ptr::eq(z.cast::<C>(), &z.x.c));
    assert!(std::ptr::eq(z.cast::<Base>(), &z.x.c.base));

    assert_eq!(z.cast::<Base>().tag, 3);
    assert_eq!(z.cast::<A>().base.tag, 1);
    assert_eq!(z.cast::<B>().base.tag, 2);
}

struct Stage {
    tag: u8,
}

rtti! {
    impl Stage as "Stage" {}
}

struct Probe {
    stage: Stage,
    mid_identity: Option<&'static str>,
}

impl Class for Probe {
    const NAME: &'static str = "Probe";

    fn class_meta() -> &'static ClassMeta {
        static META: LazyLock<&'static ClassMeta> = LazyLock::new(|| {
            ClassMeta::register(Probe::NAME, Probe::CLASS_ID, &[Stage::class_meta()])
        });

        *META
    }
}

impl Layer for Probe {
    fn mount(&mut self, table: &mut CrossPtrs) {
        Layer::mount(&mut self.stage, table);

        self.mid_identity = Some(table.rtti().name());

        table.record(self);
    }
}

#[test]
fn identity_grows_during_mounting() {
    let probe = Instance::new(Probe {
        stage: Stage { tag: 1 },
        mid_identity: None,
    });

    assert_eq!(probe.stage.tag, 1);

    // Between the parent's recording and its own, the object is the parent.
    assert_eq!(probe.mid_identity, Some("Stage"));
    assert_eq!(probe.rtti().name(), "Probe");
}

fn relocate<T>(value: T) -> T {
    value
}

#[test]
fn casts_survive_instance_moves() {
    let pet = Instance::new(Pet {
        animal: Animal { name: "Rex" },
        owner: "Sam",
    });

    let animal = pet.try_cast::<Animal>().map(|animal| animal as *const Animal);

    let mut pet = relocate(pet);

    assert_eq!(
        pet.try_cast::<Animal>().map(|animal| animal as *const Animal),
        animal,
    );

    pet.cast_mut::<Animal>().name = "Max";

    assert_eq!(pet.animal.name, "Max");
    assert_eq!(pet.cast::<Animal>().name, "Max");
}

#[test]
fn instance_unboxing() {
    let pet = Instance::new(Pet {
        animal: Animal { name: "Rex" },
        owner: "Sam",
    });

    let raw = pet.into_inner();

    assert_eq!(raw.animal.name, "Rex");
    assert_eq!(raw.owner, "Sam");
}

#[test]
#[should_panic(expected = "already registered")]
fn duplicate_identifier_is_fatal() {
    let _ = ClassMeta::register("DupFirst", ClassId::of("DupName"), &[]);
    let _ = ClassMeta::register("DupSecond", ClassId::of("DupName"), &[]);
}

#[test]
#[should_panic(expected = "not registered")]
fn unknown_identifier_query_is_fatal() {
    let _ = Hierarchy::global().is_ancestor(ClassId::of("Ghost"), ClassId::of("AlsoGhost"));
}
