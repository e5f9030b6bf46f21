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

use std::cell::RefCell;

use lineage::{
    rtti,
    rtti::{Class, ClassVisitor, Instance, Visitor},
};

struct Event {
    source: &'static str,
}

struct KeyEvent {
    event: Event,
    code: u32,
}

struct MouseEvent {
    event: Event,
    x: i32,
    y: i32,
}

struct DoubleClickEvent {
    mouse: MouseEvent,
    interval: u32,
}

struct Signal {
    number: i32,
}

rtti! {
    impl Event as "Event" {}
    impl KeyEvent as "KeyEvent" { event: Event }
    impl MouseEvent as "MouseEvent" { event: Event }
    impl DoubleClickEvent as "DoubleClickEvent" { mouse: MouseEvent }
    impl Signal as "Signal" {}
}

#[test]
fn closest_handler_wins() {
    let trace = RefCell::new(Vec::new());

    let mut visitor = Visitor::new();

    visitor.on(|event: &Event| {
        trace.borrow_mut().push(format!("event from {}", event.source));
        true
    });

    visitor.on(|mouse: &MouseEvent| {
        trace.borrow_mut().push(format!("mouse at {}:{}", mouse.x, mouse.y));
        true
    });

    let key = Instance::new(KeyEvent {
        event: Event { source: "keyboard" },
        code: 13,
    });

    let double_click = Instance::new(DoubleClickEvent {
        mouse: MouseEvent {
            event: Event { source: "mouse" },
            x: 10,
            y: 20,
        },
        interval: 180,
    });

    assert_eq!(key.code, 13);
    assert_eq!(double_click.interval, 180);

    // No KeyEvent handler: the dispatch falls back to the Event ancestor.
    assert!(visitor.visit(key.as_object()));

    // The MouseEvent handler shadows the Event handler for its descendants.
    assert!(visitor.visit(double_click.as_object()));

    drop(visitor);

    assert_eq!(
        trace.into_inner(),
        ["event from keyboard", "mouse at 10:20"],
    );
}

#[test]
fn declined_dispatch_continues_upward() {
    let trace = RefCell::new(Vec::new());

    let mut visitor = Visitor::new();

    visitor.on(|_: &Event| {
        trace.borrow_mut().push("event");
        true
    });

    visitor.on(|_: &MouseEvent| {
        trace.borrow_mut().push("mouse");
        false
    });

    let mouse = Instance::new(MouseEvent {
        event: Event { source: "mouse" },
        x: 1,
        y: 2,
    });

    assert!(visitor.visit(mouse.as_object()));

    drop(visitor);

    assert_eq!(trace.into_inner(), ["mouse", "event"]);
}

#[test]
fn unhandled_object_reports_a_miss() {
    let mut visitor = Visitor::new();

    visitor.on(|_: &Event| true);

    let signal = Instance::new(Signal { number: 15 });

    assert_eq!(signal.number, 15);
    assert!(!visitor.visit(signal.as_object()));
}

#[test]
fn exact_handler_shadows_ancestors() {
    let handled_by = RefCell::new(None);

    let mut visitor = Visitor::new();

    visitor.on(|_: &Event| {
        *handled_by.borrow_mut() = Some("Event");
        true
    });

    visitor.on(|_: &KeyEvent| {
        *handled_by.borrow_mut() = Some("KeyEvent");
        true
    });

    let key = Instance::new(KeyEvent {
        event: Event { source: "keyboard" },
        code: 42,
    });

    assert!(visitor.visit(key.as_object()));

    drop(visitor);

    assert_eq!(handled_by.into_inner(), Some("KeyEvent"));
}

#[test]
fn class_dispatch_without_an_instance() {
    let mut subjects = Vec::new();

    let mut visitor = ClassVisitor::new();

    visitor.on::<Event>(|subject| {
        subjects.push(subject.name());
        true
    });

    // Force the descendants into the hierarchy before dispatching over them.
    let _ = KeyEvent::class_meta();
    let _ = DoubleClickEvent::class_meta();
    let _ = Signal::class_meta();

    assert!(visitor.visit(KeyEvent::CLASS_ID));
    assert!(visitor.visit(DoubleClickEvent::CLASS_ID));
    assert!(visitor.visit(Event::CLASS_ID));

    assert!(!visitor.visit(Signal::CLASS_ID));

    drop(visitor);

    assert_eq!(subjects, ["KeyEvent", "DoubleClickEvent", "Event"]);
}
