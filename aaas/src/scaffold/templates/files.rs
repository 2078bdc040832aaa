//! Embedded template contents

/// Doctrine entity class with API resource annotation
pub const ENTITY_TEMPLATE: &str = r#"<?php

namespace {{namespace}};

{{#if api_resource}}use ApiPlatform\Core\Annotation\ApiResource;
{{/if}}use Doctrine\ORM\Mapping as ORM;

/**
{{#if api_resource}} * @ApiResource()
{{/if}} * @ORM\Entity(repositoryClass="{{repository_full_class_name}}")
 */
class {{class_name}}
{
    /**
     * @ORM\Id()
     * @ORM\GeneratedValue()
     * @ORM\Column(type="integer")
     */
    private $id;

    public function getId(): ?int
    {
        return $this->id;
    }
}
"#;

/// Doctrine service repository for an entity
pub const REPOSITORY_TEMPLATE: &str = r#"<?php

namespace {{namespace}};

use {{entity_full_class_name}};
use Doctrine\Bundle\DoctrineBundle\Repository\ServiceEntityRepository;
use Symfony\Bridge\Doctrine\RegistryInterface;

/**
 * @method {{short_name entity_full_class_name}}|null find($id, $lockMode = null, $lockVersion = null)
 * @method {{short_name entity_full_class_name}}|null findOneBy(array $criteria, array $orderBy = null)
 * @method {{short_name entity_full_class_name}}[]    findAll()
 * @method {{short_name entity_full_class_name}}[]    findBy(array $criteria, array $orderBy = null, $limit = null, $offset = null)
 */
class {{class_name}} extends ServiceEntityRepository
{
    public function __construct(RegistryInterface $registry)
    {
        parent::__construct($registry, {{short_name entity_full_class_name}}::class);
    }

    // /**
    //  * @return {{short_name entity_full_class_name}}[] Returns an array of {{short_name entity_full_class_name}} objects
    //  */
    /*
    public function findByExampleField($value)
    {
        return $this->createQueryBuilder('{{entity_alias}}')
            ->andWhere('{{entity_alias}}.exampleField = :val')
            ->setParameter('val', $value)
            ->orderBy('{{entity_alias}}.id', 'ASC')
            ->setMaxResults(10)
            ->getQuery()
            ->getResult()
        ;
    }
    */
}
"#;
