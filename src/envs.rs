//! Builtin environment tables: each environment predefines global
//! identifiers the engine treats as known. `es*` entries stack, so a later
//! language year includes everything an earlier one added.

/// Language builtins assumed known regardless of environment.
pub const BUILTIN: &[&str] = &[
    "Array",
    "Boolean",
    "Date",
    "Error",
    "Function",
    "Infinity",
    "JSON",
    "Math",
    "NaN",
    "Number",
    "Object",
    "RegExp",
    "String",
    "decodeURI",
    "decodeURIComponent",
    "encodeURI",
    "encodeURIComponent",
    "isFinite",
    "isNaN",
    "parseFloat",
    "parseInt",
    "undefined",
];

const BROWSER: &[&str] = &[
    "window",
    "document",
    "navigator",
    "location",
    "history",
    "console",
    "alert",
    "localStorage",
    "sessionStorage",
    "fetch",
    "setTimeout",
    "setInterval",
    "clearTimeout",
    "clearInterval",
    "requestAnimationFrame",
    "XMLHttpRequest",
    "Event",
    "CustomEvent",
];

const NODE: &[&str] = &[
    "global",
    "process",
    "require",
    "module",
    "exports",
    "__dirname",
    "__filename",
    "Buffer",
    "console",
    "setTimeout",
    "setInterval",
    "clearTimeout",
    "clearInterval",
    "setImmediate",
    "queueMicrotask",
    "URL",
    "URLSearchParams",
];

const SHARED_NODE_BROWSER: &[&str] = &[
    "console",
    "setTimeout",
    "setInterval",
    "clearTimeout",
    "clearInterval",
    "URL",
    "URLSearchParams",
];

const WORKER: &[&str] = &[
    "self",
    "postMessage",
    "importScripts",
    "console",
    "fetch",
    "setTimeout",
    "setInterval",
    "clearTimeout",
    "clearInterval",
];

const ES2015: &[&str] = &[
    "Promise",
    "Symbol",
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "Proxy",
    "Reflect",
    "ArrayBuffer",
    "DataView",
    "Int8Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "Int16Array",
    "Uint16Array",
    "Int32Array",
    "Uint32Array",
    "Float32Array",
    "Float64Array",
];

const ES2017: &[&str] = &["Atomics", "SharedArrayBuffer"];

const ES2020: &[&str] = &["BigInt", "BigInt64Array", "BigUint64Array", "globalThis"];

const ES2021: &[&str] = &["AggregateError", "WeakRef", "FinalizationRegistry"];

const JEST: &[&str] = &[
    "describe",
    "it",
    "test",
    "expect",
    "beforeAll",
    "afterAll",
    "beforeEach",
    "afterEach",
    "jest",
];

/// Globals predefined by a named environment, or `None` when the name is not
/// a known environment.
#[must_use]
pub fn globals(name: &str) -> Option<Vec<&'static str>> {
    let stacked: &[&[&str]] = match name {
        "browser" => &[BROWSER],
        "node" => &[NODE],
        "shared-node-browser" => &[SHARED_NODE_BROWSER],
        "worker" => &[WORKER],
        "es6" | "es2015" => &[ES2015],
        "es2017" => &[ES2015, ES2017],
        "es2020" => &[ES2015, ES2017, ES2020],
        "es2021" => &[ES2015, ES2017, ES2020, ES2021],
        "jest" => &[JEST],
        _ => return None,
    };
    Some(stacked.concat())
}

#[must_use]
pub fn is_known(name: &str) -> bool {
    globals(name).is_some()
}
