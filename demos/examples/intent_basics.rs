// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intent prediction basics.
//!
//! Drive an `IntentManager` over a small headless page with synthetic pointer,
//! keyboard and scroll input, and print which elements would be prefetched.
//!
//! Run:
//! - `cargo run -p understory_demos --example intent_basics`
//! - `RUST_LOG=understory_intent=trace cargo run -p understory_demos --example intent_basics`

use kurbo::{Point, Rect};
use understory_demos::{DemoPage, init_tracing, scroll_by};
use understory_intent::{CallbackHook, HitSlop, IntentManager, Key, RegisterOptions};

fn main() {
    init_tracing();

    let page = DemoPage::new()
        .with(1, "home", Rect::new(20.0, 20.0, 100.0, 50.0), true)
        .with(2, "docs", Rect::new(120.0, 20.0, 200.0, 50.0), true)
        .with(3, "pricing", Rect::new(220.0, 20.0, 300.0, 50.0), true)
        .with(4, "blog", Rect::new(320.0, 20.0, 400.0, 50.0), true)
        .with(5, "signup", Rect::new(600.0, 300.0, 760.0, 360.0), true)
        .with(6, "footer-card", Rect::new(200.0, 1_200.0, 600.0, 1_400.0), false);
    let labels: Vec<(u32, &'static str)> = (1..=6).map(|id| (id, page.label(id))).collect();

    let mut intent = IntentManager::new(page);
    for (id, label) in labels {
        let options = RegisterOptions::new().name(label);
        let options = if label == "footer-card" {
            options.persistent()
        } else {
            options.hit_slop(HitSlop::uniform(8.0))
        };
        intent.register(id, move || println!("prefetch {label}"), options);
    }

    let hook: CallbackHook<u32> = Box::new(|fired| {
        println!(
            "  {:?} on {} (element total {}, global total {})",
            fired.hit, fired.name, fired.element_hits.total, fired.global_hits.total
        );
    });
    intent.set_on_any_callback_fired(Some(hook));

    println!("== pointer heading for the signup button");
    let mut t = 0;
    for step in 0..6 {
        let x = 100.0 + f64::from(step) * 40.0;
        let y = 120.0 + f64::from(step) * 20.0;
        intent.on_pointer_move(Point::new(x, y), t);
        t += 16;
    }

    println!("== tabbing through the navigation");
    intent.on_key_down(Key::Tab { shift: false });
    intent.on_focus_changed(1);

    println!("== scrolling towards the footer");
    t += 500;
    intent.on_pointer_move(Point::new(400.0, 500.0), t);
    for _ in 0..8 {
        t += 16;
        scroll_by(&mut intent, 90.0, t);
    }

    let snapshot = intent.snapshot();
    println!(
        "== {} element(s) still tracked, {} callback(s) fired, listeners installed: {}",
        snapshot.elements.len(),
        snapshot.callback_hits.total,
        intent.environment().is_listening(),
    );
    for element in &snapshot.elements {
        println!(
            "  {} hits={} in_viewport={}",
            element.name, element.callback_hits.total, element.is_intersecting_viewport
        );
    }
}
