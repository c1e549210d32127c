//! Static invoke registry: handler key, wire operation name and payload shapes per entry.
//!
//! Each entry also produces a marker type implementing [`InvokeKind`], which binds the request and
//! response shapes to the handler key at compile time. Entries are scanned in declaration order.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use teams_core::schema::{
    AppBasedLinkQuery, FileConsentCardResponse, MessagingExtensionAction,
    MessagingExtensionActionResponse, MessagingExtensionQuery, MessagingExtensionResponse,
    O365ConnectorCardActionQuery, SigninStateVerificationQuery, TaskModuleRequest,
    TaskModuleResponse,
};

/// Compile-time binding of an invoke handler key to its payload shapes.
pub trait InvokeKind: Send + Sync + 'static {
    const KEY: InvokeHandlerKey;
    type Request: DeserializeOwned + Send + 'static;
    type Response: Serialize + Send + 'static;
}

/// One registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokeDefinition {
    pub key: InvokeHandlerKey,
    /// Wire operation name matched against `activity.name`.
    pub name: &'static str,
    pub request: &'static str,
    pub response: &'static str,
}

macro_rules! invoke_registry {
    ($( $marker:ident => $key:ident ($handler:literal, $name:literal, $req:ty, $resp:ty); )*) => {
        /// Logical invoke handler slot.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum InvokeHandlerKey {
            $( $key, )*
        }

        impl InvokeHandlerKey {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( InvokeHandlerKey::$key => $handler, )*
                }
            }
        }

        $(
            #[doc = concat!("Marker for `", $name, "` invokes.")]
            #[derive(Debug, Clone, Copy)]
            pub struct $marker;

            impl InvokeKind for $marker {
                const KEY: InvokeHandlerKey = InvokeHandlerKey::$key;
                type Request = $req;
                type Response = $resp;
            }
        )*

        /// All known invoke operations, in scan order.
        pub const INVOKE_DEFINITIONS: &[InvokeDefinition] = &[
            $(
                InvokeDefinition {
                    key: InvokeHandlerKey::$key,
                    name: $name,
                    request: stringify!($req),
                    response: stringify!($resp),
                },
            )*
        ];
    };
}

invoke_registry! {
    ExecuteAction => O365CardAction("onO365CardAction", "actionableMessage/executeAction", O365ConnectorCardActionQuery, Value);
    VerifyState => SigninStateVerification("onSigninStateVerification", "signin/verifyState", SigninStateVerificationQuery, Value);
    FileConsentInvoke => FileConsent("onFileConsent", "fileConsent/invoke", FileConsentCardResponse, Value);
    ComposeQuery => MessagingExtensionQuery("onMessagingExtensionQuery", "composeExtension/query", MessagingExtensionQuery, MessagingExtensionResponse);
    ComposeQueryLink => AppBasedLinkQuery("onAppBasedLinkQuery", "composeExtension/queryLink", AppBasedLinkQuery, MessagingExtensionResponse);
    ComposeFetchTask => MessagingExtensionFetchTask("onMessagingExtensionFetchTask", "composeExtension/fetchTask", MessagingExtensionAction, MessagingExtensionActionResponse);
    ComposeSubmitAction => MessagingExtensionSubmitAction("onMessagingExtensionSubmitAction", "composeExtension/submitAction", MessagingExtensionAction, MessagingExtensionActionResponse);
    TaskFetch => TaskModuleFetch("onTaskModuleFetch", "task/fetch", TaskModuleRequest, TaskModuleResponse);
    TaskSubmit => TaskModuleSubmit("onTaskModuleSubmit", "task/submit", TaskModuleRequest, TaskModuleResponse);
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Index of the first entry whose key or wire name repeats an earlier one.
const fn find_duplicate(definitions: &[InvokeDefinition]) -> Option<usize> {
    let mut i = 0;
    while i < definitions.len() {
        let mut j = 0;
        while j < i {
            if definitions[i].key as usize == definitions[j].key as usize
                || str_eq(definitions[i].name, definitions[j].name)
            {
                return Some(i);
            }
            j += 1;
        }
        i += 1;
    }
    None
}

const _: () = assert!(
    find_duplicate(INVOKE_DEFINITIONS).is_none(),
    "invoke registry keys and wire names must be unique"
);

/// Registry entry for a handler key.
pub fn definition(key: InvokeHandlerKey) -> &'static InvokeDefinition {
    // Every key is generated together with its entry.
    &INVOKE_DEFINITIONS[key as usize]
}

/// Registry entry whose wire name equals `name`.
pub fn definition_by_name(name: &str) -> Option<&'static InvokeDefinition> {
    INVOKE_DEFINITIONS.iter().find(|d| d.name == name)
}

impl fmt::Display for InvokeHandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
