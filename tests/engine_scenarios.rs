//! End-to-end engine scenarios.
//!
//! Each test builds two small surfaces in code, runs the standard rule set
//! through `CompatEngine` and checks the reported differences.

use api_compat::diff::{CompatEngine, CompatReport, Difference, DifferenceType};
use api_compat::filter::AttributeFilter;
use api_compat::model::{
    AccessorSurface, ApiSurface, GenericParameterSurface, MemberModifiers, MemberSurface,
    MethodSignature, Overridability, TypeSurface, Visibility,
};
use api_compat::rules::{standard_rules, RuleSettings};

// ============================================================================
// Helpers
// ============================================================================

fn surface(types: Vec<TypeSurface>) -> ApiSurface {
    ApiSurface {
        name: "Widgets".to_string(),
        types,
    }
}

fn engine_with(settings: RuleSettings) -> CompatEngine {
    CompatEngine::new(standard_rules(settings, AttributeFilter::with_defaults())).parallel(false)
}

fn compare(implementation: Vec<TypeSurface>, contract: Vec<TypeSurface>) -> CompatReport {
    engine_with(RuleSettings::default())
        .compare(&surface(implementation), &surface(contract))
        .expect("comparison should succeed")
}

fn incompatible(report: &CompatReport) -> Vec<&Difference> {
    report.incompatible_differences().collect()
}

fn with_id<'a>(report: &'a CompatReport, id: &str) -> Vec<&'a Difference> {
    report.differences().filter(|d| d.id == id).collect()
}

fn run(name: &str) -> MemberSurface {
    MemberSurface::method(name, MethodSignature::new())
}

// ============================================================================
// Interfaces
// ============================================================================

mod interfaces {
    use super::*;

    fn ifoo(members: Vec<MemberSurface>) -> TypeSurface {
        members
            .into_iter()
            .fold(TypeSurface::interface("Ns.IFoo"), TypeSurface::with_member)
    }

    #[test]
    fn removed_interface_member_is_reported() {
        let contract = ifoo(vec![run("A").with_abstract(), run("B").with_abstract()]);
        let implementation = ifoo(vec![run("A").with_abstract()]);

        let report = compare(vec![implementation], vec![contract]);
        let diffs = incompatible(&report);

        assert_eq!(diffs.len(), 1, "{diffs:?}");
        assert_eq!(diffs[0].id, "InterfacesShouldHaveSameMembers");
        assert_eq!(diffs[0].difference_type, DifferenceType::Changed);
        assert!(diffs[0].message.contains("B()"), "{}", diffs[0].message);
    }

    #[test]
    fn default_member_tolerated_when_allowed() {
        let contract = ifoo(vec![run("A").with_abstract(), run("B").with_virtual()]);
        let implementation = ifoo(vec![run("A").with_abstract()]);
        let settings = RuleSettings {
            allow_default_interface_methods: true,
        };

        let report = engine_with(settings)
            .compare(&surface(vec![implementation.clone()]), &surface(vec![contract.clone()]))
            .expect("comparison should succeed");
        assert_eq!(report.differences().count(), 0);

        let strict = compare(vec![implementation], vec![contract]);
        assert_eq!(with_id(&strict, "InterfacesShouldHaveSameMembers").len(), 1);
    }

    #[test]
    fn added_abstract_interface_member_is_reported() {
        let contract = ifoo(vec![run("A").with_abstract()]);
        let implementation = ifoo(vec![run("A").with_abstract(), run("B").with_abstract()]);

        let report = compare(vec![implementation], vec![contract]);
        let diffs = with_id(&report, "InterfacesShouldHaveSameMembers");
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].message.contains("present in the implementation but not in the contract"));
        assert!(with_id(&report, "CannotAddAbstractMembers").is_empty());
    }
}

// ============================================================================
// Sealing and virtuality
// ============================================================================

mod sealing {
    use super::*;

    fn foo() -> TypeSurface {
        TypeSurface::class("Ns.Foo").with_member(MemberSurface::constructor())
    }

    #[test]
    fn sealing_a_class_reports_one_difference() {
        let report = compare(vec![foo().with_sealed(true)], vec![foo()]);
        let diffs = incompatible(&report);

        assert_eq!(diffs.len(), 1, "{diffs:?}");
        assert_eq!(diffs[0].id, "CannotSealType");
        assert_eq!(diffs[0].difference_type, DifferenceType::Changed);
        assert_eq!(
            diffs[0].message,
            "Type 'Ns.Foo' is sealed in the implementation but not sealed in the contract."
        );
    }

    #[test]
    fn private_constructor_seals_effectively() {
        let implementation = TypeSurface::class("Ns.Foo")
            .with_member(MemberSurface::constructor().with_visibility(Visibility::Private));
        let report = compare(vec![implementation], vec![foo()]);

        let diffs = with_id(&report, "CannotSealType");
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].message.contains("effectively (has a private constructor) sealed"));
    }

    #[test]
    fn interfaces_are_never_sealed() {
        let report = compare(
            vec![TypeSurface::interface("Ns.IFoo").with_sealed(true)],
            vec![TypeSurface::interface("Ns.IFoo")],
        );
        assert!(with_id(&report, "CannotSealType").is_empty());
    }

    #[test]
    fn private_constructor_makes_virtual_members_non_virtual() {
        let open = foo().with_member(run("Run").with_virtual());
        let closed = TypeSurface::class("Ns.Foo")
            .with_member(MemberSurface::constructor().with_visibility(Visibility::Private))
            .with_member(run("Run").with_virtual());

        let run_open = &open.members[1];
        let run_closed = &closed.members[1];
        assert_eq!(Overridability::classify(run_open, &open), Overridability::Virtual);
        assert_eq!(Overridability::classify(run_closed, &closed), Overridability::None);

        let report = compare(vec![closed], vec![open]);
        assert_eq!(with_id(&report, "CannotMakeMemberNonVirtual").len(), 1);
    }

    #[test]
    fn making_a_member_virtual_is_not_reported() {
        let report = compare(
            vec![foo().with_member(run("Run").with_virtual())],
            vec![foo().with_member(run("Run"))],
        );
        assert!(incompatible(&report).is_empty());
    }
}

// ============================================================================
// Member existence
// ============================================================================

mod member_existence {
    use super::*;

    fn foo_int() -> MemberSurface {
        MemberSurface::method("Foo", MethodSignature::new().with_parameter("value", "System.Int32"))
    }

    fn base(member: MemberSurface) -> TypeSurface {
        TypeSurface::class("Ns.Base")
            .with_member(MemberSurface::constructor())
            .with_member(member)
    }

    fn derived(members: Vec<MemberSurface>) -> TypeSurface {
        members.into_iter().fold(
            TypeSurface::class("Ns.Derived")
                .with_base_type("Ns.Base")
                .with_member(MemberSurface::constructor()),
            TypeSurface::with_member,
        )
    }

    #[test]
    fn member_moved_to_base_still_exists() {
        let contract = vec![base(run("Other")), derived(vec![foo_int()])];
        let implementation = vec![base(run("Other")).with_member(foo_int()), derived(Vec::new())];

        let report = compare(implementation, contract);
        assert!(with_id(&report, "MembersMustExist").is_empty(), "{:?}", incompatible(&report));
    }

    #[test]
    fn base_member_with_other_parameter_type_does_not_count() {
        let foo_string = MemberSurface::method(
            "Foo",
            MethodSignature::new().with_parameter("value", "System.String"),
        );
        let contract = vec![base(run("Other")), derived(vec![foo_int()])];
        let implementation = vec![base(run("Other")).with_member(foo_string), derived(Vec::new())];

        let report = compare(implementation, contract);
        let diffs = with_id(&report, "MembersMustExist");
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].difference_type, DifferenceType::Added);
        assert!(diffs[0].message.contains("Ns.Derived.Foo(System.Int32)"), "{}", diffs[0].message);
    }

    #[test]
    fn constructors_are_never_inherited() {
        let ctor = MemberSurface::constructor_with(
            MethodSignature::new().with_parameter("value", "System.Int32"),
        );
        let contract = vec![base(run("Other")), derived(vec![ctor.clone()])];
        let implementation = vec![
            base(run("Other")).with_member(ctor),
            derived(Vec::new()),
        ];

        let report = compare(implementation, contract);
        let breaking = incompatible(&report);
        assert!(
            breaking.iter().any(|d| d.message.contains("Ns.Derived")),
            "removed constructor should be reported: {breaking:?}"
        );
    }

    #[test]
    fn generic_base_match_checks_arity_only() {
        let constrained = MemberSurface::method(
            "Map",
            MethodSignature::new()
                .with_generic_parameter(GenericParameterSurface::new("T").value_type()),
        );
        let unconstrained = MemberSurface::method(
            "Map",
            MethodSignature::new().with_generic_parameter(GenericParameterSurface::new("T")),
        );
        let contract = vec![base(run("Other")), derived(vec![constrained])];
        let implementation =
            vec![base(run("Other")).with_member(unconstrained), derived(Vec::new())];

        let report = compare(implementation, contract);
        assert!(with_id(&report, "MembersMustExist").is_empty());
    }

    #[test]
    fn generic_base_arguments_are_substituted() {
        let foo_t =
            MemberSurface::method("Foo", MethodSignature::new().with_parameter("value", "T"));
        let generic_base = TypeSurface::class("Ns.Base<T>")
            .with_member(MemberSurface::constructor())
            .with_member(foo_t);
        let closed_derived = |members: Vec<MemberSurface>| {
            members.into_iter().fold(
                TypeSurface::class("Ns.Derived")
                    .with_base_type("Ns.Base<System.Int32>")
                    .with_member(MemberSurface::constructor()),
                TypeSurface::with_member,
            )
        };
        let contract = vec![generic_base.clone(), closed_derived(vec![foo_int()])];
        let implementation = vec![generic_base, closed_derived(Vec::new())];

        let report = compare(implementation, contract);
        assert!(with_id(&report, "MembersMustExist").is_empty(), "{:?}", incompatible(&report));
    }
}

// ============================================================================
// Signatures
// ============================================================================

mod signatures {
    use super::*;

    fn widget(members: Vec<MemberSurface>) -> TypeSurface {
        members.into_iter().fold(
            TypeSurface::class("Ns.Widget").with_member(MemberSurface::constructor()),
            TypeSurface::with_member,
        )
    }

    fn accessor() -> Option<AccessorSurface> {
        Some(AccessorSurface::new(MemberModifiers::default()))
    }

    #[test]
    fn changed_return_type_is_reported() {
        let run_returning = |return_type: &str| {
            MemberSurface::method("Run", MethodSignature::returning(return_type))
        };
        let report = compare(
            vec![widget(vec![run_returning("System.Int64")])],
            vec![widget(vec![run_returning("System.Int32")])],
        );
        let diffs = with_id(&report, "MembersMustExist");
        assert_eq!(diffs.len(), 1, "{:?}", incompatible(&report));
        assert!(diffs[0].message.starts_with("Member 'Ns.Widget.Run()' does not exist"));
        assert!(diffs[0].message.ends_with(
            "There does exist a member with return type 'System.Int64' instead of 'System.Int32'"
        ));
    }

    #[test]
    fn changed_field_type_is_reported() {
        let count = |field_type: &str| MemberSurface::field("Count", field_type);
        let report = compare(
            vec![widget(vec![count("System.String")])],
            vec![widget(vec![count("System.Int32")])],
        );
        let diffs = with_id(&report, "MembersMustExist");
        assert_eq!(diffs.len(), 1, "{:?}", incompatible(&report));
        assert!(diffs[0].message.starts_with("Member 'Ns.Widget.Count' does not exist"));
    }

    #[test]
    fn removed_property_and_event_are_reported() {
        let name = MemberSurface::property("Name", "System.String", accessor(), accessor());
        let changed =
            MemberSurface::event("Changed", "System.EventHandler", accessor(), accessor());
        let report = compare(vec![widget(Vec::new())], vec![widget(vec![name, changed])]);

        let messages: Vec<&str> = with_id(&report, "MembersMustExist")
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            messages,
            [
                "Member 'Ns.Widget.Name' does not exist in the implementation \
                 but it does exist in the contract.",
                "Member 'Ns.Widget.Changed' does not exist in the implementation \
                 but it does exist in the contract.",
            ]
        );
    }

    #[test]
    fn removed_setter_is_reported() {
        let name = |setter| MemberSurface::property("Name", "System.String", accessor(), setter);
        let report = compare(vec![widget(vec![name(None)])], vec![widget(vec![name(accessor())])]);

        let diffs = with_id(&report, "MembersMustExist");
        assert_eq!(diffs.len(), 1, "{:?}", incompatible(&report));
        assert_eq!(
            diffs[0].message,
            "Member 'Ns.Widget.set_Name(System.String)' does not exist in the implementation \
             but it does exist in the contract."
        );
    }

    #[test]
    fn member_made_private_is_reported() {
        let report = compare(
            vec![widget(vec![run("Run").with_visibility(Visibility::Private)])],
            vec![widget(vec![run("Run")])],
        );
        let diffs = with_id(&report, "MembersMustExist");
        assert_eq!(diffs.len(), 1, "{:?}", incompatible(&report));
        assert_eq!(diffs[0].difference_type, DifferenceType::Added);
    }
}

// ============================================================================
// Enums and generics
// ============================================================================

mod values {
    use super::*;

    fn color(underlying: &str, red: i64) -> TypeSurface {
        TypeSurface::enumeration("Ns.Color", underlying)
            .with_member(MemberSurface::enum_value("Red", "Ns.Color", red))
    }

    #[test]
    fn changed_enum_value() {
        let report = compare(vec![color("System.Int32", 2)], vec![color("System.Int32", 1)]);
        let diffs = with_id(&report, "EnumValuesMustMatch");
        assert_eq!(diffs.len(), 1);
        assert_eq!(
            diffs[0].message,
            "Enum value 'Ns.Color.Red' is (2) in the implementation but (1) in the contract."
        );
    }

    #[test]
    fn changed_underlying_type_carries_types() {
        let report = compare(vec![color("System.Int64", 1)], vec![color("System.Int32", 1)]);
        let diffs = with_id(&report, "EnumTypesMustMatch");
        assert_eq!(diffs.len(), 1);
        let mismatch = diffs[0].type_mismatch.as_ref().expect("type mismatch attached");
        assert_eq!(mismatch.implementation.name(), "System.Int64");
        assert_eq!(mismatch.contract.name(), "System.Int32");
    }

    #[test]
    fn constraint_order_does_not_matter() {
        let make = |first: &str, second: &str| {
            TypeSurface::class("Ns.Box`1")
                .with_member(MemberSurface::constructor())
                .with_generic_parameter(
                    GenericParameterSurface::new("T")
                        .with_constraint(first)
                        .with_constraint(second),
                )
        };
        let report = compare(
            vec![make("System.IDisposable", "System.IComparable")],
            vec![make("System.IComparable", "System.IDisposable")],
        );
        assert!(incompatible(&report).is_empty(), "{:?}", incompatible(&report));
    }
}

// ============================================================================
// Engine properties
// ============================================================================

mod properties {
    use super::*;

    fn messy_pair() -> (ApiSurface, ApiSurface) {
        let contract = surface(vec![
            TypeSurface::class("Ns.A")
                .with_member(MemberSurface::constructor())
                .with_member(run("Run").with_virtual())
                .with_member(run("Gone")),
            TypeSurface::interface("Ns.IB").with_member(run("X").with_abstract()),
            TypeSurface::class("Ns.C").with_member(MemberSurface::constructor()),
        ]);
        let implementation = surface(vec![
            TypeSurface::class("Ns.A")
                .with_sealed(true)
                .with_member(MemberSurface::constructor())
                .with_member(run("Run").with_virtual()),
            TypeSurface::interface("Ns.IB"),
            TypeSurface::class("Ns.D"),
        ]);
        (implementation, contract)
    }

    #[test]
    fn repeated_runs_are_identical() {
        let (implementation, contract) = messy_pair();
        let engine = engine_with(RuleSettings::default());

        let first = engine.compare(&implementation, &contract).expect("first run");
        let second = engine.compare(&implementation, &contract).expect("second run");

        assert_eq!(first.outcomes, second.outcomes);
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
        assert!(first.has_incompatible());
    }

    #[test]
    fn parallel_matches_sequential() {
        let (mut implementation, mut contract) = messy_pair();
        for i in 0..200 {
            let ty = TypeSurface::class(format!("Ns.Filler{i}"))
                .with_member(MemberSurface::constructor());
            implementation.types.push(ty.clone().with_sealed(i % 3 == 0));
            contract.types.push(ty);
        }

        let sequential = engine_with(RuleSettings::default())
            .compare(&implementation, &contract)
            .expect("sequential run");
        let rules = standard_rules(RuleSettings::default(), AttributeFilter::with_defaults());
        let parallel = CompatEngine::new(rules)
            .parallel(true)
            .compare(&implementation, &contract)
            .expect("parallel run");

        assert_eq!(sequential.outcomes, parallel.outcomes);
    }

    #[test]
    fn outcome_order_is_contract_first() {
        let (implementation, contract) = messy_pair();
        let report = engine_with(RuleSettings::default())
            .compare(&implementation, &contract)
            .expect("comparison");
        let types: Vec<&str> = report
            .outcomes
            .iter()
            .filter(|o| o.level == api_compat::diff::ElementLevel::Type)
            .map(|o| o.element.as_str())
            .collect();
        assert_eq!(types, ["Ns.A", "Ns.IB", "Ns.C", "Ns.D"]);
    }

    #[test]
    fn unresolved_kind_aborts_the_pass() {
        let mut broken = TypeSurface::class("Ns.A");
        broken.kind = api_compat::model::TypeKind::Unresolved;
        let result = engine_with(RuleSettings::default())
            .compare(&surface(vec![broken]), &surface(vec![TypeSurface::class("Ns.A")]));
        assert!(result.is_err());
    }
}
