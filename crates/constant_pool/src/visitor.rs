use crate::{DynamicRef, MemberRef, MethodHandle, NameAndType};

/// Callbacks invoked by [`ConstantPool::accept`](crate::ConstantPool::accept), one per constant
/// kind.
///
/// Every method defaults to doing nothing, so implementors only override the kinds they care
/// about. Kinds sharing a value type (e.g. class names and string literals) still get separate
/// callbacks.
#[allow(unused_variables)]
pub trait ConstantVisitor {
    fn visit_utf8(&mut self, value: &str) {}

    fn visit_integer(&mut self, value: i32) {}

    fn visit_float(&mut self, value: f32) {}

    fn visit_long(&mut self, value: i64) {}

    fn visit_double(&mut self, value: f64) {}

    fn visit_class(&mut self, name: &str) {}

    fn visit_string(&mut self, value: &str) {}

    fn visit_field_ref(&mut self, reference: &MemberRef) {}

    fn visit_method_ref(&mut self, reference: &MemberRef) {}

    fn visit_interface_method_ref(&mut self, reference: &MemberRef) {}

    fn visit_name_and_type(&mut self, name_and_type: &NameAndType) {}

    fn visit_method_handle(&mut self, handle: &MethodHandle) {}

    fn visit_method_type(&mut self, descriptor: &str) {}

    fn visit_dynamic(&mut self, dynamic: &DynamicRef) {}

    fn visit_invoke_dynamic(&mut self, dynamic: &DynamicRef) {}

    fn visit_module(&mut self, name: &str) {}

    fn visit_package(&mut self, name: &str) {}
}
