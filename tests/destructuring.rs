//! End-to-end tests of the destructuring engine.
//!
//! Exceptions are built the way an application would build them, attached to
//! a [`Record`] and enriched with a fully configured [`ExceptionEnricher`].
//! The assertions only look at the produced [`Detail`] tree.

use std::{
    any::{Any, TypeId},
    sync::{Arc, Mutex},
};

use exdetail::{
    Detail, DetailMap, Obj, PropertyDecl, Reflect, Thrown, TypeInfo, Value,
    bag::PropertiesBag,
    destructurer::{DestructureScope, Destructurer},
    destructurers::ExceptionDestructurer,
    enricher::{ExceptionEnricher, LogRecord, Record},
    error::{BagError, ConfigError},
    exceptions::{
        AggregateException, ArgumentException, ArgumentOutOfRangeException, Exception,
        ExceptionCore, ExceptionRef, INVALID_OPERATION_EXCEPTION, InvalidOperationException,
        SocketError, SocketException, TaskCanceledException, TimeoutException,
    },
    filters::ignore_stack_trace_and_target_site,
    objects::{DeferredQuery, List, TaskHandle, Uri},
    options::DestructuringOptions,
};

fn destructure_with(options: &DestructuringOptions, exception: ExceptionRef) -> Option<DetailMap> {
    let mut record = Record::new("operation failed").with_exception(exception);
    let enricher = ExceptionEnricher::new(options).unwrap();
    enricher.enrich(&mut record);
    record
        .property(enricher.root_name())
        .and_then(Detail::as_map)
        .cloned()
}

fn destructure(exception: ExceptionRef) -> DetailMap {
    destructure_with(&DestructuringOptions::default(), exception).unwrap()
}

fn keys(detail: &DetailMap) -> Vec<&str> {
    detail.keys().map(String::as_str).collect()
}

// A user-defined exception reached through the reflection-based fallback.

struct LedgerException {
    base: InvalidOperationException,
    account: &'static str,
    payload: Value,
}

struct OverdraftException {
    base: LedgerException,
    account: u64,
}

fn ledger_account(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<LedgerException>()?.account.into())
}

fn ledger_payload(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<LedgerException>()?.payload.clone())
}

fn ledger_balance(_: &dyn Reflect) -> Result<Value, Thrown> {
    Err(Thrown::new("ledger::StorageException", "ledger offline"))
}

fn ledger_audit(_: &dyn Reflect) -> Result<Value, Thrown> {
    panic!("audit log corrupted")
}

fn overdraft_account(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<OverdraftException>()?.account.into())
}

static LEDGER_PROPERTIES: [PropertyDecl; 5] = [
    PropertyDecl::new("Account", ledger_account),
    PropertyDecl::new("Payload", ledger_payload),
    PropertyDecl::new("Balance", ledger_balance),
    PropertyDecl::new("Audit", ledger_audit),
    PropertyDecl::new("Secret", ledger_account).non_public(),
];

static LEDGER_EXCEPTION: TypeInfo =
    TypeInfo::new::<LedgerException>("LedgerException", "ledger::LedgerException")
        .extends(&INVALID_OPERATION_EXCEPTION)
        .with_properties(&LEDGER_PROPERTIES);

static OVERDRAFT_PROPERTIES: [PropertyDecl; 2] = [
    PropertyDecl::new("Account", overdraft_account),
    PropertyDecl::write_only("Limit"),
];

static OVERDRAFT_EXCEPTION: TypeInfo =
    TypeInfo::new::<OverdraftException>("OverdraftException", "ledger::OverdraftException")
        .extends(&LEDGER_EXCEPTION)
        .with_properties(&OVERDRAFT_PROPERTIES);

impl Reflect for LedgerException {
    fn type_info(&self) -> &'static TypeInfo {
        &LEDGER_EXCEPTION
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn upcast(&self, type_id: TypeId) -> Option<&dyn Any> {
        if type_id == TypeId::of::<Self>() {
            Some(self)
        } else {
            self.base.upcast(type_id)
        }
    }
}

impl Exception for LedgerException {
    fn core(&self) -> &ExceptionCore {
        self.base.core()
    }
}

impl Reflect for OverdraftException {
    fn type_info(&self) -> &'static TypeInfo {
        &OVERDRAFT_EXCEPTION
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn upcast(&self, type_id: TypeId) -> Option<&dyn Any> {
        if type_id == TypeId::of::<Self>() {
            Some(self)
        } else {
            self.base.upcast(type_id)
        }
    }
}

impl Exception for OverdraftException {
    fn core(&self) -> &ExceptionCore {
        self.base.core()
    }
}

fn ledger(payload: impl Into<Value>) -> LedgerException {
    LedgerException {
        base: InvalidOperationException::new("ledger rejected the entry"),
        account: "ACC-1",
        payload: payload.into(),
    }
}

// A plain object graph used as property payload.

struct Node {
    label: &'static str,
    next: Mutex<Option<Arc<Node>>>,
}

fn node_label(this: &dyn Reflect) -> Result<Value, Thrown> {
    Ok(this.part::<Node>()?.label.into())
}

fn node_next(this: &dyn Reflect) -> Result<Value, Thrown> {
    let next = this.part::<Node>()?.next.lock().unwrap().clone();
    Ok(next.map_or(Value::Null, |next| Value::shared(&next)))
}

static NODE_PROPERTIES: [PropertyDecl; 2] = [
    PropertyDecl::new("Label", node_label),
    PropertyDecl::new("Next", node_next),
];

static NODE: TypeInfo =
    TypeInfo::new::<Node>("Node", "ledger::Node").with_properties(&NODE_PROPERTIES);

impl Reflect for Node {
    fn type_info(&self) -> &'static TypeInfo {
        &NODE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn chain(labels: &[&'static str]) -> Arc<Node> {
    let mut next = None;
    for &label in labels.iter().rev() {
        next = Some(Arc::new(Node {
            label,
            next: Mutex::new(next),
        }));
    }
    next.unwrap()
}

#[test]
fn test_argument_exception() {
    let exception = ArgumentException::new("MSG")
        .with_param_name("paramName")
        .into_ref();
    let detail = destructure(exception);

    assert_eq!(keys(&detail), ["Type", "Message", "Source", "StackTrace", "ParamName"]);
    assert_eq!(detail["Message"].as_str(), Some("MSG"));
    assert_eq!(detail["ParamName"].as_str(), Some("paramName"));
    assert_eq!(detail["Type"].as_str(), Some("exdetail::exceptions::argument::ArgumentException"));
    assert!(detail["StackTrace"].is_null());
    assert!(!detail.contains_key("$id"));
    assert!(!detail.contains_key("$ref"));
}

#[test]
fn test_optional_base_fields() {
    let core = ExceptionCore::new("disk full")
        .with_help_link("https://example.com/help")
        .with_hresult(-2146232832)
        .with_source("storage")
        .with_stack_trace("at flush");
    core.data().insert("attempt", 3);
    let detail = destructure(core.into_ref());

    assert_eq!(
        keys(&detail),
        ["Type", "Data", "HelpLink", "HResult", "Message", "Source", "StackTrace"]
    );
    assert_eq!(detail["Data"].get("attempt"), Some(&Detail::from(3)));
    assert_eq!(detail["HResult"], Detail::from(-2146232832));
    assert_eq!(detail["Source"].as_str(), Some("storage"));
}

#[test]
fn test_inner_exception_and_aggregate_order() {
    let first = ArgumentOutOfRangeException::new("index")
        .with_actual_value(12)
        .into_ref();
    let second = TimeoutException::new("no reply").into_ref();
    let aggregate = AggregateException::new([first, second]).into_ref();
    let detail = destructure(aggregate);

    let inner = detail["InnerException"].as_map().unwrap();
    assert_eq!(inner["ActualValue"], Detail::from(12));

    let all = detail["InnerExceptions"].as_list().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(
        all[0].get("Type").and_then(Detail::as_str),
        Some("exdetail::exceptions::argument::ArgumentOutOfRangeException")
    );
    assert_eq!(
        all[0].get("Message").and_then(Detail::as_str),
        Some(ArgumentOutOfRangeException::DEFAULT_MESSAGE)
    );
    assert_eq!(all[0].get("ParamName").and_then(Detail::as_str), Some("index"));
    assert_eq!(
        all[1].get("Type").and_then(Detail::as_str),
        Some("exdetail::exceptions::system::TimeoutException")
    );
    assert_eq!(all[1].get("Message").and_then(Detail::as_str), Some("no reply"));
}

#[test]
fn test_uri_in_data_is_a_string() {
    let core = ExceptionCore::new("fetch failed");
    core.data().insert(
        "Endpoint",
        Value::object(Uri::parse("HTTPS://Example.com/api/../v2").unwrap()),
    );
    let detail = destructure(core.into_ref());
    assert_eq!(
        detail["Data"].get("Endpoint").and_then(Detail::as_str),
        Some("https://example.com/v2")
    );
}

#[test]
fn test_self_reference_through_data() {
    let exception = InvalidOperationException::new("loop").into_ref();
    let itself: Obj = exception.clone();
    exception.core().data().insert("Self", Value::Object(itself));

    let detail = destructure(exception.clone());
    let data = &detail["Data"];
    assert_eq!(data.get("$id").and_then(Detail::as_str), Some("1"));
    let nested = data.get("Self").unwrap();
    assert_eq!(nested.get("Message").and_then(Detail::as_str), Some("loop"));
    assert_eq!(
        nested.get("Data").and_then(|data| data.get("$ref")).and_then(Detail::as_str),
        Some("1")
    );

    exception.core().data().clear();
}

#[test]
fn test_reflected_properties() {
    let payload = chain(&["a", "b"]);
    let detail = destructure(ledger(Value::shared(&payload)).into_ref());

    assert_eq!(
        keys(&detail),
        ["Message", "Source", "StackTrace", "Account", "Payload", "Balance", "Audit", "Type"]
    );
    assert_eq!(detail["Account"].as_str(), Some("ACC-1"));
    assert_eq!(
        detail["Payload"].get("Next").and_then(|next| next.get("Label")),
        Some(&Detail::from("b"))
    );
    assert_eq!(
        detail["Balance"].as_str(),
        Some("threw ledger::StorageException: ledger offline")
    );
    assert_eq!(detail["Audit"].as_str(), Some("threw panic: audit log corrupted"));
    assert_eq!(detail["Type"].as_str(), Some("ledger::LedgerException"));
}

#[test]
fn test_shadowed_property_is_qualified() {
    let exception = OverdraftException {
        base: ledger(Value::Null),
        account: 42,
    };
    let detail = destructure(exception.into_ref());

    assert_eq!(detail["Account"], Detail::from(42u64));
    assert_eq!(detail["LedgerException.Account"].as_str(), Some("ACC-1"));
    assert!(!detail.contains_key("Limit"));
    assert!(!detail.contains_key("Secret"));
}

#[test]
fn test_depth_cutoff() {
    let payload = chain(&["a", "b", "c"]);
    let options = DestructuringOptions::builder().depth(2).build().unwrap();
    let detail =
        destructure_with(&options, ledger(Value::shared(&payload)).into_ref()).unwrap();

    let first = &detail["Payload"];
    assert_eq!(first.get("Label").and_then(Detail::as_str), Some("a"));
    let second = first.get("Next").unwrap();
    assert_eq!(second.get("Label").and_then(Detail::as_str), Some("b"));
    let third = second.get("Next").unwrap();
    assert!(third.as_opaque().is_some());
}

#[test]
fn test_filter_removes_stack_trace() {
    let options = DestructuringOptions::builder()
        .filter(ignore_stack_trace_and_target_site())
        .build()
        .unwrap();
    let exception = ExceptionCore::new("m").with_stack_trace("at main").into_ref();
    let detail = destructure_with(&options, exception).unwrap();

    assert!(!detail.contains_key("StackTrace"));
    assert_eq!(detail["Message"].as_str(), Some("m"));
}

#[test]
fn test_filter_reaches_exceptions_nested_in_data() {
    let options = DestructuringOptions::builder()
        .filter(ignore_stack_trace_and_target_site())
        .build()
        .unwrap();
    let cause: Obj = Arc::new(ExceptionCore::new("nested").with_stack_trace("at nested"));
    let core = ExceptionCore::new("outer").with_stack_trace("at outer");
    core.data().insert("Cause", Value::Object(cause));
    let detail = destructure_with(&options, core.into_ref()).unwrap();

    assert!(!detail.contains_key("StackTrace"));
    let cause = detail["Data"].get("Cause").unwrap();
    assert_eq!(cause.get("Message").and_then(Detail::as_str), Some("nested"));
    assert!(cause.get("StackTrace").is_none());
    assert!(cause.get("TargetSite").is_none());
}

#[test]
fn test_filter_reaches_faulted_task_walked_as_value() {
    let options = DestructuringOptions::builder()
        .filter(ignore_stack_trace_and_target_site())
        .build()
        .unwrap();
    let fault = ExceptionCore::new("task failed")
        .with_stack_trace("at worker")
        .into_ref();
    let task = TaskHandle::faulted(3, fault);
    let detail = destructure_with(&options, ledger(Value::object(task)).into_ref()).unwrap();

    let fault = detail["Payload"].get("Exception").unwrap();
    assert_eq!(fault.get("Message").and_then(Detail::as_str), Some("task failed"));
    assert!(fault.get("StackTrace").is_none());
}

#[test]
fn test_deferred_query_is_not_evaluated() {
    let query = DeferredQuery::new(|| panic!("query evaluated"));
    let detail = destructure(ledger(Value::object(query)).into_ref());
    assert_eq!(detail["Payload"].as_str(), Some("IQueryable skipped"));
}

#[test]
fn test_faulted_task() {
    let fault = SocketException::new(SocketError::ConnectionRefused).into_ref();
    let task = Arc::new(TaskHandle::faulted(7, fault));
    let detail = destructure(TaskCanceledException::for_task(task).into_ref());

    assert_eq!(
        detail["CancellationToken"].as_str(),
        Some("CancellationNotRequested")
    );
    let task = detail["Task"].as_map().unwrap();
    assert_eq!(task["Id"], Detail::from(7u64));
    assert_eq!(task["Status"].as_str(), Some("Faulted"));
    let fault = task["Exception"].as_map().unwrap();
    assert_eq!(fault["SocketErrorCode"].as_str(), None);
    assert_eq!(
        fault["SocketErrorCode"].as_scalar().map(ToString::to_string).as_deref(),
        Some("ConnectionRefused")
    );
    assert_eq!(
        fault["SocketErrorCodeMessage"].as_str(),
        Some(SocketError::ConnectionRefused.description())
    );
}

#[test]
fn test_shared_list_uses_values_wrapper() {
    let shared = Arc::new(List::new());
    shared.push("x");
    let outer = List::new();
    outer.push(Value::shared(&shared));
    outer.push(Value::shared(&shared));

    let detail = destructure(ledger(Value::object(outer)).into_ref());
    let items = detail["Payload"].as_list().unwrap();
    assert_eq!(items[0].get("$id").and_then(Detail::as_str), Some("1"));
    assert_eq!(
        items[0].get("$values"),
        Some(&Detail::from(vec![Detail::from("x")]))
    );
    assert_eq!(items[1].get("$ref").and_then(Detail::as_str), Some("1"));
}

// Exceptions declaring properties named like the reserved type keys.

struct TypedException {
    base: InvalidOperationException,
    with_fallback_key: bool,
}

fn typed_type(_: &dyn Reflect) -> Result<Value, Thrown> {
    Ok("custom".into())
}

fn typed_fallback(this: &dyn Reflect) -> Result<Value, Thrown> {
    let this = this.part::<TypedException>()?;
    Ok(if this.with_fallback_key {
        "custom fallback".into()
    } else {
        Value::Null
    })
}

static TYPED_PROPERTIES: [PropertyDecl; 1] = [PropertyDecl::new("Type", typed_type)];

static TYPED_EXCEPTION: TypeInfo =
    TypeInfo::new::<TypedException>("TypedException", "ledger::TypedException")
        .extends(&INVALID_OPERATION_EXCEPTION)
        .with_properties(&TYPED_PROPERTIES);

static DOUBLY_TYPED_PROPERTIES: [PropertyDecl; 2] = [
    PropertyDecl::new("Type", typed_type),
    PropertyDecl::new("$Type", typed_fallback),
];

struct DoublyTypedException {
    base: TypedException,
}

static DOUBLY_TYPED_EXCEPTION: TypeInfo =
    TypeInfo::new::<DoublyTypedException>("DoublyTypedException", "ledger::DoublyTypedException")
        .extends(&INVALID_OPERATION_EXCEPTION)
        .with_properties(&DOUBLY_TYPED_PROPERTIES);

impl Reflect for TypedException {
    fn type_info(&self) -> &'static TypeInfo {
        &TYPED_EXCEPTION
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn upcast(&self, type_id: TypeId) -> Option<&dyn Any> {
        if type_id == TypeId::of::<Self>() {
            Some(self)
        } else {
            self.base.upcast(type_id)
        }
    }
}

impl Exception for TypedException {
    fn core(&self) -> &ExceptionCore {
        self.base.core()
    }
}

impl Reflect for DoublyTypedException {
    fn type_info(&self) -> &'static TypeInfo {
        &DOUBLY_TYPED_EXCEPTION
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn upcast(&self, type_id: TypeId) -> Option<&dyn Any> {
        if type_id == TypeId::of::<Self>() {
            Some(self)
        } else {
            self.base.upcast(type_id)
        }
    }
}

impl Exception for DoublyTypedException {
    fn core(&self) -> &ExceptionCore {
        self.base.core()
    }
}

fn typed(with_fallback_key: bool) -> TypedException {
    TypedException {
        base: InvalidOperationException::new("typed"),
        with_fallback_key,
    }
}

#[test]
fn test_type_property_moves_type_name_to_fallback_key() {
    let detail = destructure(typed(false).into_ref());

    assert_eq!(detail["Type"].as_str(), Some("custom"));
    assert_eq!(detail["$Type"].as_str(), Some("ledger::TypedException"));
    assert_eq!(keys(&detail).last(), Some(&"$Type"));
}

#[test]
fn test_both_type_keys_taken() {
    let exception = DoublyTypedException { base: typed(true) };
    let detail = destructure(exception.into_ref());

    assert_eq!(detail["Type"].as_str(), Some("custom"));
    assert_eq!(detail["$Type"].as_str(), Some("custom fallback"));
    assert_eq!(
        keys(&detail),
        ["Message", "Source", "StackTrace", "Type", "$Type"]
    );
}

#[test]
fn test_duplicate_registration_fails() {
    let error = DestructuringOptions::builder()
        .destructurer(ExceptionDestructurer)
        .build()
        .unwrap_err();
    assert!(matches!(error, ConfigError::DuplicateDestructurer { .. }));
}

struct PanickingDestructurer;

static PANICKING_TARGETS: [&TypeInfo; 1] = [&LEDGER_EXCEPTION];

impl Destructurer for PanickingDestructurer {
    fn target_types(&self) -> &[&'static TypeInfo] {
        &PANICKING_TARGETS
    }

    fn destructure(
        &self,
        _: &dyn Exception,
        _: &mut PropertiesBag<'_>,
        _: &mut DestructureScope<'_>,
    ) -> Result<(), BagError> {
        panic!("destructurer bug")
    }
}

#[test]
fn test_panicking_destructurer_is_contained() {
    let options = DestructuringOptions::builder()
        .destructurer(PanickingDestructurer)
        .build()
        .unwrap();
    let detail = destructure_with(&options, ledger(Value::Null).into_ref()).unwrap();

    assert_eq!(keys(&detail), ["Message", "Type"]);
    assert_eq!(detail["Message"].as_str(), Some("ledger rejected the entry"));
    assert_eq!(detail["Type"].as_str(), Some("ledger::LedgerException"));
}

#[test]
fn test_reflection_disabled() {
    let options = DestructuringOptions::builder()
        .disable_reflection_based_destructurer()
        .build()
        .unwrap();
    assert_eq!(destructure_with(&options, ledger(Value::Null).into_ref()), None);
    assert!(destructure_with(&options, ExceptionCore::new("m").into_ref()).is_some());
}

#[test]
fn test_existing_root_property_is_kept() {
    let enricher = ExceptionEnricher::new(&DestructuringOptions::default()).unwrap();
    let mut record = Record::new("retry")
        .with_exception(ExceptionCore::new("m").into_ref())
        .with_property("ExceptionDetail", 1);
    enricher.enrich(&mut record);

    assert_eq!(record.property("ExceptionDetail"), Some(&Detail::from(1)));
    assert!(record.exception().is_some());
}

#[cfg(feature = "serde")]
#[test]
fn test_json_rendering() {
    let exception = ArgumentException::new("MSG")
        .with_param_name("paramName")
        .into_ref();
    let detail = destructure(exception);

    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "Type": "exdetail::exceptions::argument::ArgumentException",
            "Message": "MSG",
            "Source": null,
            "StackTrace": null,
            "ParamName": "paramName",
        })
    );
}
