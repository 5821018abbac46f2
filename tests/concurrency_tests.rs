//! Concurrent instantiation against a shared synthesizer.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use abstract_synth::{TypeId, TypeSynthesizer};

use common::{assert_not_implemented, load_fixture, synthesized_types};

#[test]
fn test_two_threads_request_animal_simultaneously() {
    let fixture = load_fixture("zoo.json");
    let animal = fixture.id("Zoo.Animal");
    let synthesizer = TypeSynthesizer::new_shared(Arc::clone(&fixture.registry));
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let synthesizer = Arc::clone(&synthesizer);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                synthesizer.instantiate(animal)
            })
        })
        .collect();

    let instances: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked").expect("instantiate"))
        .collect();

    assert_eq!(instances[0].type_id(), instances[1].type_id());
    assert_ne!(instances[0], instances[1]);
    assert_eq!(synthesized_types(&fixture.registry), vec![instances[0].type_id()]);
    assert_eq!(synthesizer.len(), 1);
    for instance in &instances {
        assert_not_implemented(instance.invoke("Speak", &[], &[]), "Animal.Speak");
    }

    let snap = synthesizer.metrics().snapshot();
    assert_eq!(snap.synthesized, 1);
    assert_eq!(snap.cache_hits, 1);
}

#[test]
fn test_many_threads_many_contracts() {
    let fixture = load_fixture("zoo.json");
    let contracts: Vec<TypeId> = ["Zoo.INamed", "Zoo.IFeedable", "Zoo.Animal", "Zoo.Dog", "Zoo.Puppy"]
        .iter()
        .map(|name| fixture.id(name))
        .collect();
    let synthesizer = TypeSynthesizer::new_shared(Arc::clone(&fixture.registry));
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let synthesizer = Arc::clone(&synthesizer);
            let barrier = Arc::clone(&barrier);
            let mut order = contracts.clone();
            order.rotate_left(i % contracts.len());
            thread::spawn(move || {
                barrier.wait();
                order
                    .into_iter()
                    .map(|c| (c, synthesizer.instantiate(c).expect("instantiate").type_id()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<(TypeId, TypeId)>> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    for (contract, concrete) in results.iter().flatten() {
        match synthesizer.cached_type(*contract) {
            Some(cached) => assert_eq!(*concrete, cached),
            None => assert_eq!(concrete, contract, "only concrete types skip the cache"),
        }
    }
    // Dog is concrete; the other four each got exactly one type.
    assert_eq!(synthesizer.len(), 4);
    assert_eq!(synthesized_types(&fixture.registry).len(), 4);
}

#[test]
fn test_prewarm_then_concurrent_reads() {
    let fixture = load_fixture("shapes.json");
    let shape = fixture.id("Geometry.Shape");
    let polygon = fixture.id("Geometry.Polygon");
    let synthesizer = TypeSynthesizer::new_shared(Arc::clone(&fixture.registry));

    let warmed: Vec<TypeId> = synthesizer
        .prewarm(&[shape, polygon])
        .into_iter()
        .map(|r| r.expect("prewarm"))
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let synthesizer = Arc::clone(&synthesizer);
            thread::spawn(move || {
                (
                    synthesizer.instantiate(shape).expect("shape").type_id(),
                    synthesizer.instantiate(polygon).expect("polygon").type_id(),
                )
            })
        })
        .collect();
    for handle in handles {
        let (s, p) = handle.join().expect("thread panicked");
        assert_eq!(s, warmed[0]);
        assert_eq!(p, warmed[1]);
    }
    assert_eq!(synthesizer.metrics().snapshot().synthesized, 2);
}
