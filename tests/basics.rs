use keyed_di::{DiContainer, Factory, Implementation, Instance, RegisterOptions};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_concrete_singleton() {
    let container = DiContainer::new();
    container.register_singleton(
        Some(Factory::new(|| Instance::new(42usize))),
        RegisterOptions::new("Answer"),
    );
    container.register_singleton(
        Some(Factory::new(|| Instance::new(String::from("hello")))),
        RegisterOptions::new("Greeting"),
    );

    let num1 = container.get("Answer").unwrap();
    let num2 = container.get("Answer").unwrap();
    let str1 = container.get("Greeting").unwrap();
    let str2 = container.get("Greeting").unwrap();

    assert_eq!(*num1.downcast::<usize>().unwrap(), 42);
    assert_eq!(*str1.downcast::<String>().unwrap(), "hello");
    assert!(num1.ptr_eq(&num2)); // Same instance
    assert!(str1.ptr_eq(&str2)); // Same instance
}

#[test]
fn test_factory_value_round_trips() {
    #[derive(Debug, PartialEq)]
    struct Payload {
        foo: String,
    }

    let container = DiContainer::new();
    container.register_singleton(
        Some(Factory::new(|| Instance::new(Payload { foo: "bar".to_string() }))),
        RegisterOptions::new("A"),
    );

    let payload = container.get("A").unwrap().downcast::<Payload>().unwrap();
    assert_eq!(*payload, Payload { foo: "bar".to_string() });
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let container = DiContainer::new();
    container.register_transient(
        Some(Factory::new(move || {
            let n = counter_clone.fetch_add(1, Ordering::SeqCst) + 1;
            Instance::new(format!("instance-{}", n))
        })),
        RegisterOptions::new("Request"),
    );

    let a = container.get("Request").unwrap();
    let b = container.get("Request").unwrap();
    let c = container.get("Request").unwrap();

    assert_eq!(*a.downcast::<String>().unwrap(), "instance-1");
    assert_eq!(*b.downcast::<String>().unwrap(), "instance-2");
    assert_eq!(*c.downcast::<String>().unwrap(), "instance-3");

    // All different instances
    assert!(!a.ptr_eq(&b));
    assert!(!b.ptr_eq(&c));
    assert!(!a.ptr_eq(&c));
}

#[test]
fn test_replace_semantics() {
    let container = DiContainer::new();

    // Register first value
    container.register_singleton(
        Some(Factory::new(|| Instance::new(1usize))),
        RegisterOptions::new("Port"),
    );
    // Replace with second value
    container.register_singleton(
        Some(Factory::new(|| Instance::new(2usize))),
        RegisterOptions::new("Port"),
    );

    // Should get the last registered value
    let value = container.get("Port").unwrap();
    assert_eq!(*value.downcast::<usize>().unwrap(), 2);
}

#[test]
fn test_complex_dependency_graph() {
    struct ServiceA {
        value: i32,
    }

    struct ServiceB {
        a: Arc<ServiceA>,
    }

    struct ServiceC {
        b: Arc<ServiceB>,
    }

    let container = DiContainer::new();
    container.register_singleton(None, RegisterOptions::new("ServiceA")
        .with_implementation(Implementation::new(|_| Instance::new(ServiceA { value: 100 }))));
    container.register_singleton(None, RegisterOptions::new("ServiceB")
        .with_implementation(
            Implementation::new(|args| Instance::new(ServiceB {
                a: args[0].downcast::<ServiceA>().unwrap(),
            }))
            .with_constructor_arguments([Some("ServiceA".to_string())]),
        ));
    container.register_singleton(None, RegisterOptions::new("ServiceC")
        .with_implementation(
            Implementation::new(|args| Instance::new(ServiceC {
                b: args[0].downcast::<ServiceB>().unwrap(),
            }))
            .with_constructor_arguments([Some("ServiceB".to_string())]),
        ));

    let c = container.get("ServiceC").unwrap().downcast::<ServiceC>().unwrap();
    assert_eq!(c.b.a.value, 100);

    // Singleton sub-dependencies are shared with direct resolutions.
    let b = container.get("ServiceB").unwrap().downcast::<ServiceB>().unwrap();
    let a = container.get("ServiceA").unwrap().downcast::<ServiceA>().unwrap();
    assert!(Arc::ptr_eq(&c.b, &b));
    assert!(Arc::ptr_eq(&b.a, &a));
}

#[test]
fn test_transients_share_singleton_dependencies() {
    struct Shared;
    struct Worker {
        shared: Arc<Shared>,
    }

    let container = DiContainer::new();
    container.register_singleton(None, RegisterOptions::new("Shared")
        .with_implementation(Implementation::new(|_| Instance::new(Shared))));
    container.register_transient(None, RegisterOptions::new("Worker")
        .with_implementation(
            Implementation::new(|args| Instance::new(Worker {
                shared: args[0].downcast::<Shared>().unwrap(),
            }))
            .with_constructor_arguments([Some("Shared".to_string())]),
        ));

    let w1 = container.get("Worker").unwrap().downcast::<Worker>().unwrap();
    let w2 = container.get("Worker").unwrap().downcast::<Worker>().unwrap();

    assert!(!Arc::ptr_eq(&w1, &w2)); // Fresh workers
    assert!(Arc::ptr_eq(&w1.shared, &w2.shared)); // Shared singleton inside
}

#[test]
fn test_skipped_argument_positions_receive_unset() {
    struct Service {
        skipped_was_unset: bool,
        injected: Arc<usize>,
    }

    let container = DiContainer::new();
    container.register_singleton(
        Some(Factory::new(|| Instance::new(7usize))),
        RegisterOptions::new("Seven"),
    );
    container.register_singleton(None, RegisterOptions::new("Service")
        .with_implementation(
            Implementation::new(|args| Instance::new(Service {
                skipped_was_unset: args[0].is_unset(),
                injected: args[1].downcast::<usize>().unwrap(),
            }))
            .with_constructor_arguments([None, Some("Seven".to_string())]),
        ));

    let service = container.get("Service").unwrap().downcast::<Service>().unwrap();
    assert!(service.skipped_was_unset);
    assert_eq!(*service.injected, 7);
}

#[test]
fn test_factory_returning_unset_resolves_without_error() {
    struct Dependent {
        received_unset: bool,
    }

    let container = DiContainer::new();
    container.register_singleton(
        Some(Factory::new(Instance::unset)),
        RegisterOptions::new("IMaybe"),
    );
    container.register_singleton(None, RegisterOptions::new("Dependent")
        .with_implementation(
            Implementation::new(|args| Instance::new(Dependent {
                received_unset: args[0].is_unset(),
            }))
            .with_constructor_arguments([Some("IMaybe".to_string())]),
        ));

    // Resolving the unset-producing service itself is not an error.
    assert!(container.get("IMaybe").unwrap().is_unset());

    // And a dependent receives the unset handle without error.
    let dependent = container.get("Dependent").unwrap().downcast::<Dependent>().unwrap();
    assert!(dependent.received_unset);
}

#[test]
fn test_unset_singletons_are_not_cached() {
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_clone = runs.clone();

    let container = DiContainer::new();
    container.register_singleton(
        Some(Factory::new(move || {
            runs_clone.fetch_add(1, Ordering::SeqCst);
            Instance::unset()
        })),
        RegisterOptions::new("IMaybe"),
    );

    let _ = container.get("IMaybe").unwrap();
    let _ = container.get("IMaybe").unwrap();

    // An unset result never enters the cache, so the factory reran.
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
#[should_panic(expected = "non-empty service identifier")]
fn test_empty_identifier_is_a_contract_violation() {
    let container = DiContainer::new();
    let _ = container.get("");
}

#[test]
#[serial]
fn test_global_container_is_shared() {
    DiContainer::global().register_singleton(
        Some(Factory::new(|| Instance::new(1234u16))),
        RegisterOptions::new("GlobalPort"),
    );

    let port = DiContainer::global().get("GlobalPort").unwrap();
    assert_eq!(*port.downcast::<u16>().unwrap(), 1234);
}

#[test]
#[serial]
fn test_global_container_membership() {
    DiContainer::global().register_transient(
        Some(Factory::new(|| Instance::new(0u8))),
        RegisterOptions::new("GlobalProbe"),
    );

    assert!(DiContainer::global().has("GlobalProbe"));
    // Independent containers stay isolated from the global one.
    assert!(!DiContainer::new().has("GlobalProbe"));
}
