use std::{env, fs::File, io::BufReader, process};

use classpool_constant_pool::{
    ConstantPool, ConstantVisitor, DynamicRef, MemberRef, MethodHandle, NameAndType,
};

struct Printer;
impl Printer {
    fn member(kind: &str, reference: &MemberRef) {
        println!(
            "    {:<20} {}.{}:{}",
            kind,
            reference.class,
            reference.name_and_type.name,
            reference.name_and_type.descriptor
        );
    }
}
impl ConstantVisitor for Printer {
    fn visit_utf8(&mut self, value: &str) {
        println!("    {:<20} {}", "Utf8", value);
    }

    fn visit_integer(&mut self, value: i32) {
        println!("    {:<20} {}", "Integer", value);
    }

    fn visit_float(&mut self, value: f32) {
        println!("    {:<20} {}", "Float", value);
    }

    fn visit_long(&mut self, value: i64) {
        println!("    {:<20} {}", "Long", value);
    }

    fn visit_double(&mut self, value: f64) {
        println!("    {:<20} {}", "Double", value);
    }

    fn visit_class(&mut self, name: &str) {
        println!("    {:<20} {}", "Class", name);
    }

    fn visit_string(&mut self, value: &str) {
        println!("    {:<20} {:?}", "String", value);
    }

    fn visit_field_ref(&mut self, reference: &MemberRef) {
        Self::member("Fieldref", reference);
    }

    fn visit_method_ref(&mut self, reference: &MemberRef) {
        Self::member("Methodref", reference);
    }

    fn visit_interface_method_ref(&mut self, reference: &MemberRef) {
        Self::member("InterfaceMethodref", reference);
    }

    fn visit_name_and_type(&mut self, name_and_type: &NameAndType) {
        println!(
            "    {:<20} {}:{}",
            "NameAndType", name_and_type.name, name_and_type.descriptor
        );
    }

    fn visit_method_handle(&mut self, handle: &MethodHandle) {
        Self::member(&handle.kind.to_string(), &handle.reference);
    }

    fn visit_method_type(&mut self, descriptor: &str) {
        println!("    {:<20} {}", "MethodType", descriptor);
    }

    fn visit_dynamic(&mut self, dynamic: &DynamicRef) {
        println!(
            "    {:<20} #{}:{}",
            "Dynamic", dynamic.bootstrap_method_attr_index, dynamic.name_and_type.name
        );
    }

    fn visit_invoke_dynamic(&mut self, dynamic: &DynamicRef) {
        println!(
            "    {:<20} #{}:{}",
            "InvokeDynamic", dynamic.bootstrap_method_attr_index, dynamic.name_and_type.name
        );
    }

    fn visit_module(&mut self, name: &str) {
        println!("    {:<20} {}", "Module", name);
    }

    fn visit_package(&mut self, name: &str) {
        println!("    {:<20} {}", "Package", name);
    }
}

fn main() {
    pretty_env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: dump_constant_pool <class file>");
        process::exit(2);
    };
    let file = File::open(&path).unwrap_or_else(|e| {
        log::error!("Could not open {}: {}", path, e);
        process::exit(1);
    });

    let (version, mut pool) = match ConstantPool::from_class_file(BufReader::new(file)) {
        Ok(opened) => opened,
        Err(e) => {
            log::error!("Could not read class file header of {}: {}", path, e);
            process::exit(1);
        }
    };
    println!("Class file version: {}", version);
    println!("Constant pool count: {}", pool.count());

    if let Err(e) = pool.accept(&mut Printer) {
        log::error!("Could not read constant pool of {}: {}", path, e);
        process::exit(1);
    }

    if let Err(e) = pool.close() {
        log::error!("Could not release {}: {}", path, e);
        process::exit(1);
    }
}
