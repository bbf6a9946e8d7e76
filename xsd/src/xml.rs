//! Namespace-qualified access to document trees.

use roxmltree::Node;

use crate::error::XsdError;

pub fn is(node: Node, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}

/// The element children of `node`, in document order.
pub fn children<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|c| c.is_element())
}

pub fn find<'a, 'input>(node: Node<'a, 'input>, namespace: &str, name: &str) -> Option<Node<'a, 'input>> {
    children(node).find(|c| is(*c, namespace, name))
}

/// Follows `path` one child at a time, taking the first match at each step.
pub fn find_path<'a, 'input>(
    node: Node<'a, 'input>,
    path: &[(&str, &str)],
) -> Option<Node<'a, 'input>> {
    path.iter()
        .try_fold(node, |current, (namespace, name)| find(current, namespace, name))
}

pub fn findall<'a, 'input, 'n>(
    node: Node<'a, 'input>,
    namespace: &'n str,
    name: &'n str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'n
where
    'a: 'n,
    'input: 'n,
{
    children(node).filter(move |c| is(*c, namespace, name))
}

pub fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, XsdError> {
    node.attribute(name)
        .ok_or_else(|| XsdError::missing_attribute(node, name))
}
