use islet_spm::mm::{translate_attributes, MemAttr};

#[kani::proof]
fn verify_translate_attributes() {
    // Initialize the attribute word (symbolic input)
    let bits: u64 = kani::any();

    let attr = translate_attributes(bits);

    // Base attributes can't be dropped through the SMC encoding
    assert!(attr.contains(MemAttr::MEMORY | MemAttr::SECURE));
    assert!(!attr.contains(MemAttr::DEVICE));

    assert_eq!(attr.contains(MemAttr::RW), bits & 0b001 != 0);
    assert_eq!(attr.contains(MemAttr::EXECUTE_NEVER), bits & 0b100 != 0);

    // Every other bit is ignored
    kani::cover!();
    assert_eq!(attr, translate_attributes(bits & 0b101));
}
